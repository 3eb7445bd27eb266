use thiserror::Error;

use crate::rules::BoundaryKind;

#[derive(Debug, Error)]
pub enum DeclarationError {
    #[error("range rule has no {0} boundary")]
    MissingBoundary(BoundaryKind),
    #[error("range rule sets both {0}Before and {0}After")]
    ConflictingBoundary(BoundaryKind),
    #[error("invalid declaration: {0}")]
    Json(#[from] serde_json::Error),
}
