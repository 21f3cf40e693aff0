//! Error types for the sync core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// A local edit could not be parsed; the text snapshot is kept but the
    /// dictionary is left as it was
    #[error("Parse failure: {0}")]
    Parse(#[from] braid_markup::ParseError),

    /// A requested id is absent from the current dictionary
    #[error("Id not found: {0}")]
    IdNotFound(#[from] braid_model::DictionaryError),
}
