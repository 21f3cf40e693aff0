use thiserror::Error;

/// Errors raised by dictionary lookups and invariant checks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DictionaryError {
    #[error("unknown node id: {0}")]
    UnknownId(String),

    #[error("node {child} is not listed among the children of its parent {parent}")]
    DetachedChild { parent: String, child: String },

    #[error("node {0} is reachable through more than one parent")]
    DuplicateChild(String),

    #[error("child {child} of {parent} does not point back at it")]
    ParentMismatch { parent: String, child: String },

    #[error("node {0} is not reachable from the root")]
    Unreachable(String),
}
