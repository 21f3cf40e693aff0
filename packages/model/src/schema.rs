use crate::dictionary::TEXT_TYPE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shape descriptor for one node type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Attribute names the type accepts
    #[serde(default)]
    pub attributes: Vec<String>,

    /// Child type names the type accepts
    #[serde(default)]
    pub children: Vec<String>,
}

/// Read-only mapping from type name to shape descriptor.
///
/// Supplied by the environment; the sync core only references it when parsing,
/// serializing, and mapping positions. The built-in `"text"` type is always
/// recognized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaSet {
    schemas: HashMap<String, Schema>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration
    pub fn with(mut self, type_name: impl Into<String>, schema: Schema) -> Self {
        self.insert(type_name, schema);
        self
    }

    pub fn insert(&mut self, type_name: impl Into<String>, schema: Schema) {
        self.schemas.insert(type_name.into(), schema);
    }

    pub fn get(&self, type_name: &str) -> Option<&Schema> {
        self.schemas.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        type_name == TEXT_TYPE || self.schemas.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
