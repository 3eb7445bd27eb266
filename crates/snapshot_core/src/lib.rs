//! Snapshot core: declarative extraction rules, free of any parsing or IO.
mod declaration;
mod error;
mod rules;

pub use declaration::RuleSet;
pub use error::DeclarationError;
pub use rules::{Boundary, BoundaryKind, Edge, SelectionRule};
