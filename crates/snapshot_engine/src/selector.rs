use ego_tree::NodeId;
use snapshot_core::SelectionRule;

use crate::document::{Document, Fragment};
use crate::error::FilterError;
use crate::range::Range;

/// Something a removal rule resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Node(NodeId),
    Range(Range),
}

impl Removal {
    /// Removes the target from the document; returns how many subtrees went away.
    pub fn apply(self, document: &mut Document) -> usize {
        match self {
            Removal::Node(id) => {
                document.detach(id);
                1
            }
            Removal::Range(range) => range.delete_contents(document),
        }
    }
}

/// Query matches are removed node by node; a range is removed as one span.
pub fn resolve_for_deletion(
    document: &Document,
    rule: &SelectionRule,
) -> Result<Vec<Removal>, FilterError> {
    match rule {
        SelectionRule::Query(selector) => Ok(document
            .select(selector)?
            .into_iter()
            .map(Removal::Node)
            .collect()),
        SelectionRule::Range { start, end } => {
            Ok(vec![Removal::Range(Range::resolve(document, start, end)?)])
        }
    }
}

/// Query matches stay live nodes; ranges are cloned out of the document.
pub fn resolve_for_extraction(
    document: &Document,
    rule: &SelectionRule,
) -> Result<Vec<Fragment>, FilterError> {
    match rule {
        SelectionRule::Query(selector) => Ok(document
            .select(selector)?
            .into_iter()
            .map(Fragment::Node)
            .collect()),
        SelectionRule::Range { start, end } => {
            let range = Range::resolve(document, start, end)?;
            Ok(vec![range.clone_contents(document)])
        }
    }
}
