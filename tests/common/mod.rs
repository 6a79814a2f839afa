//! Shared fixtures for the combo lens integration tests.
//!
//! Provides a small deck page laid out like the default [`Selectors`] expect,
//! canned EDHREC response bodies, and a polling helper for the threaded tests.

#![allow(dead_code)]

use std::thread;
use std::time::{Duration, Instant};

use edhrec_combos::{Element, PageTree};

pub const DOCKSIDE_HASH: &str = "k7lVb";
pub const BIRGI_HASH: &str = "Qp2rT";
pub const UNLISTED_HASH: &str = "zzzzz";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn preview_src(hash: &str) -> String {
    format!(
        "https://assets.moxfield.net/cards/card-{}-normal.webp?204767761",
        hash
    )
}

/// A deck page previewing the card with `hash`.
///
/// Dockside's row only has a plain link; Birgi's row has the dedicated name
/// element next to a link with different text.
pub fn deck_page(hash: &str) -> PageTree {
    PageTree::new(vec![Element::new("div")
        .with_class("deckview")
        .with_child(
            Element::new("div")
                .with_class("deckview-image")
                .with_child(Element::new("img").with_attr("src", preview_src(hash))),
        )
        .with_child(Element::new("div").with_class("deckview-sidebar"))
        .with_child(
            Element::new("table")
                .with_child(
                    Element::new("tr")
                        .with_attr("data-hash", DOCKSIDE_HASH)
                        .with_child(
                            Element::new("td").with_child(
                                Element::new("a")
                                    .with_attr("href", "/cards/dockside")
                                    .with_text("Dockside Extortionist"),
                            ),
                        ),
                )
                .with_child(
                    Element::new("tr")
                        .with_attr("data-hash", BIRGI_HASH)
                        .with_child(
                            Element::new("td").with_child(
                                Element::new("span")
                                    .with_class("decklist-card-phantomsearch")
                                    .with_text(" Birgi, God of Storytelling "),
                            ),
                        )
                        .with_child(
                            Element::new("td")
                                .with_child(Element::new("a").with_text("Birgi // Harnfel")),
                        ),
                ),
        )])
}

/// EDHREC combo page for Dockside Extortionist: one group listing Dockside
/// among its cards, one naming it only in the header, and one unrelated group.
pub fn dockside_body() -> serde_json::Value {
    serde_json::json!({
        "container": {
            "json_dict": {
                "cardlists": [
                    {
                        "header": "Dockside Extortionist + Temur Sabertooth",
                        "href": "/combos/dockside-sabertooth",
                        "cardviews": [
                            { "name": "Dockside Extortionist", "sanitized": "dockside-extortionist" },
                            { "name": "Temur Sabertooth", "sanitized": "temur-sabertooth" }
                        ],
                        "combo": { "results": ["Infinite ETB", "Infinite Treasure"] }
                    },
                    {
                        "header": "Dockside Extortionist + Cloudstone Curio",
                        "href": "/combos/dockside-curio",
                        "cardviews": [],
                        "combo": { "results": ["Infinite colorless mana"] }
                    },
                    {
                        "header": "Thassa's Oracle + Demonic Consultation",
                        "href": "/combos/thoracle-consult",
                        "cardviews": [
                            { "name": "Thassa's Oracle", "sanitized": "thassas-oracle" }
                        ],
                        "combo": { "results": ["Win the game"] }
                    }
                ]
            }
        }
    })
}

/// A combo page where nothing involves the queried card.
pub fn unrelated_body() -> serde_json::Value {
    serde_json::json!({
        "container": {
            "json_dict": {
                "cardlists": [
                    {
                        "header": "Thassa's Oracle + Demonic Consultation",
                        "href": "/combos/thoracle-consult",
                        "cardviews": [{ "sanitized": "thassas-oracle" }],
                        "combo": { "results": ["Win the game"] }
                    }
                ]
            }
        }
    })
}

/// Poll `cond` every 10 ms until it holds or `timeout` passes.
pub fn wait_until<F: FnMut() -> bool>(timeout: Duration, mut cond: F) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(10));
    }
}
