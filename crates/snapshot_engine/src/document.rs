use ego_tree::{NodeId, Tree};
use scraper::{ElementRef, Html, Node, Selector};

use crate::error::FilterError;

/// A parsed snapshot, exclusively owned by one pipeline run.
///
/// Every query walks the tree from its root, so nodes detached by service
/// filters or removal rules are never matched again.
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    pub fn tree(&self) -> &Tree<Node> {
        &self.html.tree
    }

    /// Raw access for service filters that restructure the page.
    pub fn tree_mut(&mut self) -> &mut Tree<Node> {
        &mut self.html.tree
    }

    /// Ids of all attached elements matching `selector`, in document order.
    pub fn select(&self, selector: &str) -> Result<Vec<NodeId>, FilterError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .elements()
            .filter(|element| selector.matches(element))
            .map(|element| element.id())
            .collect())
    }

    /// The first attached element matching `selector`, in document order.
    pub fn select_first(&self, selector: &str) -> Result<Option<NodeId>, FilterError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .elements()
            .find(|element| selector.matches(element))
            .map(|element| element.id()))
    }

    /// Detaches the node (and its subtree) from the document.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Detaches every element matching `selector`; returns how many were removed.
    pub fn remove_matching(&mut self, selector: &str) -> Result<usize, FilterError> {
        let ids = self.select(selector)?;
        for id in &ids {
            self.detach(*id);
        }
        Ok(ids.len())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|element| element.value().attr(name))
    }

    /// Overwrites an attribute the element already carries.
    ///
    /// Returns `false` when the node is not an element or has no such attribute.
    pub fn replace_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return false;
        };
        let Node::Element(element) = node.value() else {
            return false;
        };
        let mut replaced = false;
        for (qual_name, current) in element.attrs.iter_mut() {
            if &*qual_name.local == name {
                *current = value.into();
                replaced = true;
            }
        }
        replaced
    }

    /// Concatenated text of the node and its descendants.
    pub fn text_of(&self, id: NodeId) -> String {
        match self.html.tree.get(id) {
            Some(node) => node
                .descendants()
                .filter_map(|n| n.value().as_text().map(|t| &**t))
                .collect(),
            None => String::new(),
        }
    }

    /// Serialized markup of an element including its own tags.
    pub fn outer_html(&self, id: NodeId) -> Option<String> {
        self.element(id).map(|element| element.html())
    }

    /// Serialized markup of the whole document.
    pub fn html(&self) -> String {
        self.html.html()
    }

    fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
    }
}

/// One extraction result, kept until serialization.
#[derive(Debug)]
pub enum Fragment {
    /// An element matched by a query; still part of the live document.
    Node(NodeId),
    /// Contents cloned out of a range; independent of the document.
    Detached(Html),
}

impl Fragment {
    pub fn to_html(&self, document: &Document) -> String {
        match self {
            Fragment::Node(id) => document.outer_html(*id).unwrap_or_default(),
            Fragment::Detached(html) => html.html(),
        }
    }

    pub fn is_detached(&self) -> bool {
        matches!(self, Fragment::Detached(_))
    }
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, FilterError> {
    Selector::parse(selector).map_err(|err| FilterError::InvalidSelector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::Document;

    #[test]
    fn detached_nodes_are_not_selected_again() {
        let mut doc = Document::parse("<div><p class=a>one</p><p>two</p></div>");
        assert_eq!(doc.remove_matching("p.a").unwrap(), 1);
        let remaining = doc.select("p").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(doc.text_of(remaining[0]), "two");
    }

    #[test]
    fn replace_attribute_only_touches_existing_attributes() {
        let mut doc = Document::parse(r#"<a href="/a" title="t">x</a>"#);
        let link = doc.select_first("a").unwrap().unwrap();
        assert!(doc.replace_attribute(link, "href", "/b"));
        assert!(!doc.replace_attribute(link, "rel", "nofollow"));
        assert_eq!(doc.attribute(link, "href"), Some("/b"));
        assert_eq!(doc.attribute(link, "title"), Some("t"));
    }

    #[test]
    fn bad_selector_is_reported_with_its_text() {
        let doc = Document::parse("<p>x</p>");
        let err = doc.select("p[").unwrap_err();
        assert!(err.to_string().contains("p["));
    }
}
