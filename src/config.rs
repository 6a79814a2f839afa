use std::time::Duration;

use crate::dom::Selector;

pub const API_BASE: &str = "https://json.edhrec.com/pages/combos";
pub const SITE_ORIGIN: &str = "https://edhrec.com";

/// Element id of the injected combo panel.
pub const PANEL_ID: &str = "edhrec-combos-panel";

pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Host page locations the lens reads from and writes to.
///
/// These track the deck page's current markup. When the markup changes, a new
/// `Selectors` value can be passed to the builder instead of patching code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    /// The card preview `<img>`.
    pub preview_image: Selector,
    /// Attribute carrying the card's content hash on deck rows.
    pub hash_attribute: String,
    /// Name element inside a hashed row (first lookup strategy).
    pub card_name: Selector,
    /// Link inside a hashed row (fallback lookup strategy).
    pub row_link: Selector,
    /// Subtree observed for preview changes.
    pub watch_root: Selector,
    /// Element the combo panel is appended to.
    pub render_anchor: Selector,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            preview_image: Selector::descendant(
                Selector::class("deckview-image"),
                Selector::tag("img"),
            ),
            hash_attribute: "data-hash".to_string(),
            card_name: Selector::class("decklist-card-phantomsearch"),
            row_link: Selector::tag("a"),
            watch_root: Selector::class("deckview-image"),
            render_anchor: Selector::class("deckview-sidebar"),
        }
    }
}
