use serde::Deserialize;

// ---------------------------------------------------------------------------
// ComboRecord — One combo as shown in the panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboRecord {
    pub header: String,
    /// Path on the EDHREC site, relative to its origin.
    pub href: String,
    pub results: Vec<String>,
}

// ---------------------------------------------------------------------------
// ComboPage — `GET /pages/combos/<slug>.json` response body
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ComboPage {
    pub container: ComboContainer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComboContainer {
    pub json_dict: ComboJsonDict,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComboJsonDict {
    pub cardlists: Vec<CardList>,
}

/// A combo group: the cards involved plus what the combo achieves.
#[derive(Debug, Clone, Deserialize)]
pub struct CardList {
    pub header: Option<String>,
    pub href: Option<String>,
    pub cardviews: Option<Vec<CardView>>,
    pub combo: Option<ComboDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardView {
    pub name: Option<String>,
    pub sanitized: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComboDetails {
    pub results: Option<Vec<String>>,
}

impl CardList {
    /// Whether this group actually includes the card: one of its card views
    /// carries the slug, or its header mentions the card name verbatim.
    pub fn involves(&self, card_name: &str, slug: &str) -> bool {
        let by_slug = self
            .cardviews
            .iter()
            .flatten()
            .any(|view| view.sanitized.as_deref() == Some(slug));
        by_slug
            || self
                .header
                .as_deref()
                .map(|h| h.contains(card_name))
                .unwrap_or(false)
    }

    pub fn into_record(self) -> ComboRecord {
        ComboRecord {
            header: self.header.unwrap_or_default(),
            href: self.href.unwrap_or_default(),
            results: self.combo.and_then(|c| c.results).unwrap_or_default(),
        }
    }
}

impl ComboPage {
    /// Keep the groups that involve `card_name` and project them to records,
    /// preserving response order.
    pub fn into_combos_for(self, card_name: &str, slug: &str) -> Vec<ComboRecord> {
        self.container
            .json_dict
            .cardlists
            .into_iter()
            .filter(|list| list.involves(card_name, slug))
            .map(CardList::into_record)
            .collect()
    }
}
