use snapshot_core::BoundaryKind;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("the {boundary} selector has no match in the document for range {rule}")]
    BoundaryNotFound { boundary: BoundaryKind, rule: String },
    #[error("no service filter registered as \"{name}\"")]
    UnknownFilter { name: String },
    #[error("the provided selectors [{}] have no match in the web page", .rules.join(", "))]
    NoMatch { rules: Vec<String> },
    #[error("invalid selector \"{selector}\": {message}")]
    InvalidSelector { selector: String, message: String },
    #[error("invalid location \"{location}\": {source}")]
    InvalidLocation {
        location: String,
        source: url::ParseError,
    },
    #[error("cannot resolve link \"{href}\": {source}")]
    InvalidLink {
        href: String,
        source: url::ParseError,
    },
}
