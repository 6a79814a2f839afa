//! Works out which card the deck page is currently previewing.
//!
//! The preview image URL embeds a content hash (`.../card-<hash>-normal.webp`).
//! The same hash tags the card's row in the deck list, and that row holds the
//! display name.

use regex::Regex;

use crate::config::Selectors;
use crate::dom::{Document, Selector};

lazy_static::lazy_static! {
    static ref CARD_HASH: Regex = Regex::new(r"/card-([^-]+)-").unwrap();
}

/// Hash token between `/card-` and the next hyphen of an image URL.
pub fn extract_hash(src: &str) -> Option<&str> {
    CARD_HASH
        .captures(src)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub struct CardResolver {
    selectors: Selectors,
}

impl CardResolver {
    pub fn new(selectors: Selectors) -> Self {
        Self { selectors }
    }

    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    /// Name of the previewed card, or `None` if any step of the lookup finds
    /// nothing.
    pub fn current_card_name<D: Document + ?Sized>(&self, page: &D) -> Option<String> {
        let src = page.attribute(&self.selectors.preview_image, "src")?;
        let hash = extract_hash(&src)?;
        self.name_for_hash(page, hash)
    }

    /// Read the display name from the row tagged with `hash`, trying the name
    /// element first and the row link second.
    pub fn name_for_hash<D: Document + ?Sized>(&self, page: &D, hash: &str) -> Option<String> {
        let row = Selector::attr_eq(self.selectors.hash_attribute.as_str(), hash);
        page.text(&self.selectors.card_name.clone().within(row.clone()))
            .or_else(|| page.text(&self.selectors.row_link.clone().within(row)))
    }
}
