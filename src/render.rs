//! Builds the combo panel and swaps it into the host page.

use crate::dom::{Document, Element, Selector};
use crate::models::ComboRecord;

pub struct PanelRenderer {
    panel_id: String,
    anchor: Selector,
    site_origin: String,
}

impl PanelRenderer {
    pub fn new(
        panel_id: impl Into<String>,
        anchor: Selector,
        site_origin: impl Into<String>,
    ) -> Self {
        Self {
            panel_id: panel_id.into(),
            anchor,
            site_origin: site_origin.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn panel_id(&self) -> &str {
        &self.panel_id
    }

    /// Replace the injected panel with one for `combos`.
    ///
    /// Any previous panel is always removed first. With no combos, or when the
    /// anchor element is missing, nothing new is attached. Returns whether a
    /// panel is on the page afterwards.
    pub fn render<D: Document + ?Sized>(
        &self,
        page: &mut D,
        card_name: &str,
        combos: Option<&[ComboRecord]>,
    ) -> bool {
        page.remove_by_id(&self.panel_id);
        let combos = match combos {
            Some(combos) if !combos.is_empty() => combos,
            _ => return false,
        };
        if !page.contains(&self.anchor) {
            return false;
        }
        page.append_child(&self.anchor, self.build_panel(card_name, combos))
    }

    /// Remove the panel without rendering a new one.
    pub fn clear<D: Document + ?Sized>(&self, page: &mut D) -> bool {
        page.remove_by_id(&self.panel_id)
    }

    /// The panel element for `combos`, independent of any page.
    pub fn build_panel(&self, card_name: &str, combos: &[ComboRecord]) -> Element {
        let noun = if combos.len() == 1 { "combo" } else { "combos" };
        let title = Element::new("h3")
            .with_class("edhrec-combos-title")
            .with_style("margin", "0 0 8px 0")
            .with_text(format!("{} {} for {}", combos.len(), noun, card_name));

        let mut panel = Element::new("div")
            .with_id(self.panel_id.as_str())
            .with_class("edhrec-combos")
            .with_style("margin-top", "12px")
            .with_style("padding", "8px")
            .with_style("border", "1px solid #444")
            .with_style("border-radius", "6px")
            .with_child(title);

        for combo in combos {
            panel.children.push(self.build_entry(combo));
        }
        panel
    }

    fn build_entry(&self, combo: &ComboRecord) -> Element {
        let results = combo.results.iter().fold(
            Element::new("ul")
                .with_class("edhrec-combo-results")
                .with_style("margin", "4px 0 0 16px"),
            |list, result| list.with_child(Element::new("li").with_text(result.as_str())),
        );

        Element::new("a")
            .with_class("edhrec-combo")
            .with_attr("href", format!("{}{}", self.site_origin, combo.href))
            .with_attr("target", "_blank")
            .with_attr("rel", "noopener")
            .with_style("display", "block")
            .with_style("margin-bottom", "8px")
            .with_style("color", "inherit")
            .with_style("text-decoration", "none")
            .with_child(
                Element::new("div")
                    .with_class("edhrec-combo-header")
                    .with_style("font-weight", "bold")
                    .with_text(combo.header.as_str()),
            )
            .with_child(results)
    }
}
