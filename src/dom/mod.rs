//! Host page access.
//!
//! The lens never touches a concrete DOM. Everything it reads or writes goes
//! through the [`Document`] trait, and every lookup returns an `Option` so a
//! missing element is handled by the caller instead of surfacing as an error.
//! [`PageTree`] is an owned, in-memory implementation.

pub mod element;
pub mod tree;

pub use element::Element;
pub use tree::PageTree;

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// Typed element selector, a small subset of CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Tag name, case-insensitive (`img`).
    Tag(String),
    /// Element id (`#id`).
    Id(String),
    /// Class token (`.class`).
    Class(String),
    /// Attribute presence, or exact value when `value` is set (`[name=value]`).
    Attr { name: String, value: Option<String> },
    /// Every part must match the same element (`img.preview`).
    All(Vec<Selector>),
    /// Second selector matched inside an element matching the first (`a b`).
    Descendant(Box<Selector>, Box<Selector>),
}

impl Selector {
    pub fn tag(tag: impl Into<String>) -> Self {
        Selector::Tag(tag.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Selector::Id(id.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Selector::Class(class.into())
    }

    pub fn attr(name: impl Into<String>) -> Self {
        Selector::Attr {
            name: name.into(),
            value: None,
        }
    }

    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Selector::Attr {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn descendant(ancestor: Selector, descendant: Selector) -> Self {
        Selector::Descendant(Box::new(ancestor), Box::new(descendant))
    }

    /// Narrow this selector to elements found inside `ancestor`.
    pub fn within(self, ancestor: Selector) -> Self {
        Selector::descendant(ancestor, self)
    }

    /// Whether `element` matches, given its ancestors ordered root first.
    pub fn matches(&self, element: &Element, ancestors: &[&Element]) -> bool {
        match self {
            Selector::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
            Selector::Id(id) => element.id.as_deref() == Some(id.as_str()),
            Selector::Class(class) => element.has_class(class),
            Selector::Attr { name, value } => match (element.attribute(name), value) {
                (Some(actual), Some(expected)) => actual == expected.as_str(),
                (Some(_), None) => true,
                (None, _) => false,
            },
            Selector::All(parts) => parts.iter().all(|p| p.matches(element, ancestors)),
            Selector::Descendant(outer, inner) => {
                inner.matches(element, ancestors)
                    && (0..ancestors.len())
                        .rev()
                        .any(|i| outer.matches(ancestors[i], &ancestors[..i]))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Read/write access to the host page.
///
/// Lookups resolve to the first matching element in document order.
pub trait Document {
    /// Value of attribute `name` on the first element matching `selector`.
    fn attribute(&self, selector: &Selector, name: &str) -> Option<String>;

    /// Visible text of the first element matching `selector`, trimmed.
    /// Empty text is reported as `None`.
    fn text(&self, selector: &Selector) -> Option<String>;

    fn contains(&self, selector: &Selector) -> bool;

    /// Remove the element with the given id. Returns `true` if one was removed.
    fn remove_by_id(&mut self, id: &str) -> bool;

    /// Append `child` to the first element matching `anchor`. Returns `false`
    /// (and drops `child`) when there is no such element.
    fn append_child(&mut self, anchor: &Selector, child: Element) -> bool;
}
