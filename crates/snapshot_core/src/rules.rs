use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DeclarationError;

/// Which side of its anchor node a boundary sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Before,
    After,
}

/// Names the two ends of a range, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    Start,
    End,
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryKind::Start => write!(f, "start"),
            BoundaryKind::End => write!(f, "end"),
        }
    }
}

/// A point immediately before or after the first node matched by `anchor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    pub edge: Edge,
    pub anchor: String,
}

impl Boundary {
    pub fn before(anchor: impl Into<String>) -> Self {
        Self {
            edge: Edge::Before,
            anchor: anchor.into(),
        }
    }

    pub fn after(anchor: impl Into<String>) -> Self {
        Self {
            edge: Edge::After,
            anchor: anchor.into(),
        }
    }
}

/// One `select` or `remove` entry of a declaration.
///
/// In JSON a query is a bare CSS selector string and a range is an object
/// with one `start*` and one `end*` key, e.g.
/// `{ "startAfter": "h1", "endBefore": "footer" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub enum SelectionRule {
    Query(String),
    Range { start: Boundary, end: Boundary },
}

impl SelectionRule {
    pub fn query(selector: impl Into<String>) -> Self {
        SelectionRule::Query(selector.into())
    }

    pub fn range(start: Boundary, end: Boundary) -> Self {
        SelectionRule::Range { start, end }
    }
}

impl From<&str> for SelectionRule {
    fn from(selector: &str) -> Self {
        SelectionRule::query(selector)
    }
}

impl From<String> for SelectionRule {
    fn from(selector: String) -> Self {
        SelectionRule::Query(selector)
    }
}

impl fmt::Display for SelectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionRule::Query(selector) => f.write_str(selector),
            SelectionRule::Range { start, end } => {
                let raw = RawRange::from_boundaries(start, end);
                let json = serde_json::to_string(&raw).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawRule {
    Query(String),
    Range(RawRange),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_after: Option<String>,
}

impl RawRange {
    fn from_boundaries(start: &Boundary, end: &Boundary) -> Self {
        let mut raw = RawRange::default();
        match start.edge {
            Edge::Before => raw.start_before = Some(start.anchor.clone()),
            Edge::After => raw.start_after = Some(start.anchor.clone()),
        }
        match end.edge {
            Edge::Before => raw.end_before = Some(end.anchor.clone()),
            Edge::After => raw.end_after = Some(end.anchor.clone()),
        }
        raw
    }
}

fn boundary_from(
    kind: BoundaryKind,
    before: Option<String>,
    after: Option<String>,
) -> Result<Boundary, DeclarationError> {
    match (before, after) {
        (Some(anchor), None) => Ok(Boundary::before(anchor)),
        (None, Some(anchor)) => Ok(Boundary::after(anchor)),
        (Some(_), Some(_)) => Err(DeclarationError::ConflictingBoundary(kind)),
        (None, None) => Err(DeclarationError::MissingBoundary(kind)),
    }
}

impl TryFrom<RawRule> for SelectionRule {
    type Error = DeclarationError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        match raw {
            RawRule::Query(selector) => Ok(SelectionRule::Query(selector)),
            RawRule::Range(range) => {
                let start =
                    boundary_from(BoundaryKind::Start, range.start_before, range.start_after)?;
                let end = boundary_from(BoundaryKind::End, range.end_before, range.end_after)?;
                Ok(SelectionRule::Range { start, end })
            }
        }
    }
}

impl From<SelectionRule> for RawRule {
    fn from(rule: SelectionRule) -> Self {
        match rule {
            SelectionRule::Query(selector) => RawRule::Query(selector),
            SelectionRule::Range { start, end } => {
                RawRule::Range(RawRange::from_boundaries(&start, &end))
            }
        }
    }
}
