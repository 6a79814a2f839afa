use std::fmt::Write;

use super::Selector;

/// Elements that never have children or a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// An owned element node.
///
/// Text is modeled as a single leading run before the children, which is all
/// the panel and the deck rows need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub style: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an attribute. `id` and `class` are routed to their dedicated fields.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match name.as_str() {
            "id" => self.id = Some(value),
            "class" => self.classes = value.split_whitespace().map(str::to_string).collect(),
            _ => {
                self.attributes.retain(|(n, _)| *n != name);
                self.attributes.push((name, value));
            }
        }
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.push((property.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            _ => self
                .attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
        }
    }

    /// Own text followed by the text of every descendant, in document order.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// First descendant (not including `self`) matching `selector`.
    pub fn find(&self, selector: &Selector) -> Option<&Element> {
        let mut ancestors = vec![self];
        find_in(&self.children, selector, &mut ancestors)
    }

    /// Every descendant matching `selector`, in document order.
    pub fn find_all(&self, selector: &Selector) -> Vec<&Element> {
        let mut found = Vec::new();
        let mut ancestors = vec![self];
        collect_in(&self.children, selector, &mut ancestors, &mut found);
        found
    }

    /// Serialize as HTML, escaping text and attribute values.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if let Some(id) = &self.id {
            let _ = write!(out, " id=\"{}\"", escape(id, true));
        }
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" "), true));
        }
        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape(value, true));
        }
        if !self.style.is_empty() {
            let style: Vec<String> = self
                .style
                .iter()
                .map(|(p, v)| format!("{}: {}", p, v))
                .collect();
            let _ = write!(out, " style=\"{}\"", escape(&style.join("; "), true));
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag.to_ascii_lowercase().as_str()) {
            return;
        }
        out.push_str(&escape(&self.text, false));
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

pub(crate) fn find_in<'a>(
    nodes: &'a [Element],
    selector: &Selector,
    ancestors: &mut Vec<&'a Element>,
) -> Option<&'a Element> {
    for node in nodes {
        if selector.matches(node, ancestors) {
            return Some(node);
        }
        ancestors.push(node);
        let found = find_in(&node.children, selector, ancestors);
        ancestors.pop();
        if found.is_some() {
            return found;
        }
    }
    None
}

fn collect_in<'a>(
    nodes: &'a [Element],
    selector: &Selector,
    ancestors: &mut Vec<&'a Element>,
    found: &mut Vec<&'a Element>,
) {
    for node in nodes {
        if selector.matches(node, ancestors) {
            found.push(node);
        }
        ancestors.push(node);
        collect_in(&node.children, selector, ancestors, found);
        ancestors.pop();
    }
}

fn escape(raw: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
