use super::element::find_in;
use super::{Document, Element, Selector};

/// In-memory page body: a list of top-level elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTree {
    pub roots: Vec<Element>,
}

impl PageTree {
    pub fn new(roots: Vec<Element>) -> Self {
        Self { roots }
    }

    pub fn find(&self, selector: &Selector) -> Option<&Element> {
        find_in(&self.roots, selector, &mut Vec::new())
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.find(&Selector::id(id))
    }

    /// Set attribute `name` on every element matching `selector`. Returns the
    /// number of elements updated.
    pub fn set_attribute(&mut self, selector: &Selector, name: &str, value: &str) -> usize {
        let paths = self.locate_all(selector);
        for path in &paths {
            if let Some(el) = self.get_mut(path) {
                let updated = std::mem::take(el).with_attr(name, value);
                *el = updated;
            }
        }
        paths.len()
    }

    pub fn to_html(&self) -> String {
        self.roots.iter().map(Element::to_html).collect()
    }

    /// Index path to the first element matching `selector`.
    fn locate(&self, selector: &Selector) -> Option<Vec<usize>> {
        self.locate_all(selector).into_iter().next()
    }

    fn locate_all(&self, selector: &Selector) -> Vec<Vec<usize>> {
        let mut found = Vec::new();
        walk(&self.roots, selector, &mut Vec::new(), &mut Vec::new(), &mut found);
        found
    }

    fn get_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get_mut(*first)?;
        for idx in rest {
            node = node.children.get_mut(*idx)?;
        }
        Some(node)
    }
}

fn walk<'a>(
    nodes: &'a [Element],
    selector: &Selector,
    ancestors: &mut Vec<&'a Element>,
    path: &mut Vec<usize>,
    found: &mut Vec<Vec<usize>>,
) {
    for (idx, node) in nodes.iter().enumerate() {
        path.push(idx);
        if selector.matches(node, ancestors) {
            found.push(path.clone());
        }
        ancestors.push(node);
        walk(&node.children, selector, ancestors, path, found);
        ancestors.pop();
        path.pop();
    }
}

fn remove_id(nodes: &mut Vec<Element>, id: &str) -> bool {
    let before = nodes.len();
    nodes.retain(|n| n.id.as_deref() != Some(id));
    if nodes.len() != before {
        return true;
    }
    nodes.iter_mut().any(|n| remove_id(&mut n.children, id))
}

impl Document for PageTree {
    fn attribute(&self, selector: &Selector, name: &str) -> Option<String> {
        self.find(selector)?.attribute(name).map(str::to_string)
    }

    fn text(&self, selector: &Selector) -> Option<String> {
        let text = self.find(selector)?.text_content();
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    fn contains(&self, selector: &Selector) -> bool {
        self.find(selector).is_some()
    }

    fn remove_by_id(&mut self, id: &str) -> bool {
        remove_id(&mut self.roots, id)
    }

    fn append_child(&mut self, anchor: &Selector, child: Element) -> bool {
        let Some(path) = self.locate(anchor) else {
            return false;
        };
        match self.get_mut(&path) {
            Some(el) => {
                el.children.push(child);
                true
            }
            None => false,
        }
    }
}
