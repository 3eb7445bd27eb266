use std::collections::HashMap;

use ego_tree::iter::Edge as TreeEdge;
use ego_tree::{NodeId, NodeMut, NodeRef, Tree};
use engine_logging::engine_debug;
use scraper::{Html, Node};
use snapshot_core::{Boundary, BoundaryKind, Edge, SelectionRule};

use crate::document::{Document, Fragment};
use crate::error::FilterError;

/// A span between two boundary points of a document.
///
/// Positions are gaps in the pre-order sequence of open/close edges of the
/// tree: "before X" is the gap right before X opens, "after X" the gap right
/// after X closes. A node is inside the range when its whole open..close span
/// falls between the two gaps.
///
/// A start that lies after the end collapses the range to an empty one, the
/// way a DOM range collapses when its end is set before its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    start: (NodeId, Edge),
    end: (NodeId, Edge),
}

type Spans = HashMap<NodeId, (usize, usize)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Outside,
    Contained,
    /// Holds exactly one of the two boundaries.
    Partial,
    /// Holds both boundaries, e.g. the common ancestor.
    Encloses,
}

impl Range {
    /// Anchors each boundary on the first element its query matches.
    pub fn resolve(
        document: &Document,
        start: &Boundary,
        end: &Boundary,
    ) -> Result<Self, FilterError> {
        let start_node = anchor(document, BoundaryKind::Start, start, start, end)?;
        let end_node = anchor(document, BoundaryKind::End, end, start, end)?;
        Ok(Self {
            start: (start_node, start.edge),
            end: (end_node, end.edge),
        })
    }

    /// Detaches every node fully inside the range. Partially covered
    /// ancestors stay; only their covered children go.
    pub fn delete_contents(&self, document: &mut Document) -> usize {
        let spans = layout(document.tree());
        let Some((start, end)) = self.gaps(&spans) else {
            return 0;
        };

        let mut doomed = Vec::new();
        collect_contained(document.tree().root(), &spans, start, end, &mut doomed);
        for id in &doomed {
            document.detach(*id);
        }
        engine_debug!("range deleted {} top-level nodes", doomed.len());
        doomed.len()
    }

    /// Deep-copies the covered content into a standalone fragment. Partially
    /// covered ancestors are copied without their uncovered children.
    pub fn clone_contents(&self, document: &Document) -> Fragment {
        let mut fragment = Html::new_fragment();
        let spans = layout(document.tree());
        if let Some((start, end)) = self.gaps(&spans) {
            let mut root = fragment.tree.root_mut();
            clone_within(document.tree().root(), &mut root, &spans, start, end);
        }
        Fragment::Detached(fragment)
    }

    fn gaps(&self, spans: &Spans) -> Option<(usize, usize)> {
        let start = gap(spans, self.start)?;
        let end = gap(spans, self.end)?;
        (start < end).then_some((start, end))
    }
}

fn anchor(
    document: &Document,
    kind: BoundaryKind,
    boundary: &Boundary,
    start: &Boundary,
    end: &Boundary,
) -> Result<NodeId, FilterError> {
    document
        .select_first(&boundary.anchor)?
        .ok_or_else(|| FilterError::BoundaryNotFound {
            boundary: kind,
            rule: SelectionRule::range(start.clone(), end.clone()).to_string(),
        })
}

fn layout(tree: &Tree<Node>) -> Spans {
    let mut spans = HashMap::new();
    let mut opened = HashMap::new();
    for (index, edge) in tree.root().traverse().enumerate() {
        match edge {
            TreeEdge::Open(node) => {
                opened.insert(node.id(), index);
            }
            TreeEdge::Close(node) => {
                if let Some(open) = opened.remove(&node.id()) {
                    spans.insert(node.id(), (open, index));
                }
            }
        }
    }
    spans
}

fn gap(spans: &Spans, (node, edge): (NodeId, Edge)) -> Option<usize> {
    let (open, close) = spans.get(&node)?;
    Some(match edge {
        Edge::Before => *open,
        Edge::After => close + 1,
    })
}

fn place(spans: &Spans, id: NodeId, start: usize, end: usize) -> Placement {
    let Some(&(open, close)) = spans.get(&id) else {
        return Placement::Outside;
    };
    if start <= open && close < end {
        return Placement::Contained;
    }
    let holds_start = open < start && start <= close;
    let holds_end = open < end && end <= close;
    match (holds_start, holds_end) {
        (true, true) => Placement::Encloses,
        (false, false) => Placement::Outside,
        _ => Placement::Partial,
    }
}

fn collect_contained(
    node: NodeRef<'_, Node>,
    spans: &Spans,
    start: usize,
    end: usize,
    doomed: &mut Vec<NodeId>,
) {
    for child in node.children() {
        match place(spans, child.id(), start, end) {
            Placement::Contained => doomed.push(child.id()),
            Placement::Partial | Placement::Encloses => {
                collect_contained(child, spans, start, end, doomed)
            }
            Placement::Outside => {}
        }
    }
}

fn clone_within(
    node: NodeRef<'_, Node>,
    out: &mut NodeMut<'_, Node>,
    spans: &Spans,
    start: usize,
    end: usize,
) {
    for child in node.children() {
        match place(spans, child.id(), start, end) {
            Placement::Contained => deep_copy(child, out),
            Placement::Partial => {
                let mut shallow = out.append(child.value().clone());
                clone_within(child, &mut shallow, spans, start, end);
            }
            Placement::Encloses => clone_within(child, out, spans, start, end),
            Placement::Outside => {}
        }
    }
}

fn deep_copy(node: NodeRef<'_, Node>, out: &mut NodeMut<'_, Node>) {
    let mut copy = out.append(node.value().clone());
    for child in node.children() {
        deep_copy(child, &mut copy);
    }
}

#[cfg(test)]
mod tests {
    use super::{layout, place, Placement};
    use crate::Document;

    #[test]
    fn placement_follows_boundary_gaps() {
        let doc = Document::parse("<h1>T</h1><p>A</p><footer>F</footer>");
        let spans = layout(doc.tree());
        let h1 = doc.select_first("h1").unwrap().unwrap();
        let p = doc.select_first("p").unwrap().unwrap();
        let footer = doc.select_first("footer").unwrap().unwrap();
        let body = doc.select_first("body").unwrap().unwrap();

        let start = spans[&h1].1 + 1;
        let end = spans[&footer].0;

        assert_eq!(place(&spans, p, start, end), Placement::Contained);
        assert_eq!(place(&spans, h1, start, end), Placement::Outside);
        assert_eq!(place(&spans, footer, start, end), Placement::Outside);
        assert_eq!(place(&spans, body, start, end), Placement::Encloses);
    }

    #[test]
    fn node_holding_one_gap_is_partial() {
        let doc = Document::parse("<div><h2>a</h2><p>b</p></div><p>c</p>");
        let spans = layout(doc.tree());
        let div = doc.select_first("div").unwrap().unwrap();
        let h2 = doc.select_first("h2").unwrap().unwrap();
        let last = *doc.select("p").unwrap().last().unwrap();

        let start = spans[&h2].1 + 1;
        let end = spans[&last].1 + 1;

        assert_eq!(place(&spans, div, start, end), Placement::Partial);
        assert_eq!(place(&spans, last, start, end), Placement::Contained);
    }
}
