//! Snapshot engine: turns a raw HTML snapshot into comparable Markdown.
//!
//! Stages run in a fixed order: parse, service filters, link absolutizing,
//! removal rules, extraction rules, serialization. See [`ContentFilter`].
mod convert;
mod document;
mod error;
mod filters;
mod links;
mod pipeline;
mod range;
mod selector;

pub use convert::{Converter, Html2MdConverter};
pub use document::{Document, Fragment};
pub use error::FilterError;
pub use filters::{FilterRegistry, ServiceFilter};
pub use links::{absolutize_links, LINKS_TO_CONVERT_SELECTOR};
pub use pipeline::{filter_content, ContentFilter};
pub use range::Range;
pub use selector::{resolve_for_deletion, resolve_for_extraction, Removal};

pub use snapshot_core::{Boundary, BoundaryKind, Edge, RuleSet, SelectionRule};
