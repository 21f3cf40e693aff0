//! # Braid Model
//!
//! Structured document model shared by every Braid surface.
//!
//! The canvas renderer, the property inspector, and the text-sync adapter all
//! operate on the same value: a [`NodeDictionary`] mapping stable node ids to
//! [`Node`]s, together with a designated root. Dictionaries are replaced
//! wholesale on every change; consumers never see an in-place mutation.

pub mod dictionary;
pub mod error;
pub mod id_generator;
pub mod schema;

pub use dictionary::{Node, NodeDictionary, NodePayload, TEXT_TYPE};
pub use error::DictionaryError;
pub use id_generator::{document_seed, IdGenerator};
pub use schema::{Schema, SchemaSet};
