/// Convert a card display name into the slug used in EDHREC URLs.
///
/// Lower-cases, drops everything except ASCII letters, digits and whitespace,
/// then joins the remaining words with single hyphens.
pub fn normalize(name: &str) -> String {
    let kept: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}
