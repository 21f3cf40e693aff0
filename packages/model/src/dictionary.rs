use crate::error::DictionaryError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Type name carried by text nodes
pub const TEXT_TYPE: &str = "text";

/// Schema-typed content of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodePayload {
    /// Element node with attribute data
    Element { attributes: BTreeMap<String, String> },

    /// Raw text run
    Text { value: String },
}

impl NodePayload {
    pub fn empty_element() -> Self {
        NodePayload::Element {
            attributes: BTreeMap::new(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        NodePayload::Text {
            value: value.into(),
        }
    }
}

/// A single entry in the data dictionary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Absent only for the root
    pub parent: Option<String>,
    /// Ordered child ids
    pub children: Vec<String>,
    pub type_name: String,
    pub payload: NodePayload,
}

/// The data dictionary: id → node mapping plus a designated root.
///
/// Dictionaries are built once (by the parser or a test fixture) and then
/// treated as immutable; every document change produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDictionary {
    nodes: HashMap<String, Node>,
    root: String,
}

impl NodeDictionary {
    /// Create a dictionary holding a single root node
    pub fn with_root(id: impl Into<String>, type_name: impl Into<String>, payload: NodePayload) -> Self {
        let id = id.into();
        let root = Node {
            id: id.clone(),
            parent: None,
            children: Vec::new(),
            type_name: type_name.into(),
            payload,
        };
        let mut nodes = HashMap::new();
        nodes.insert(id.clone(), root);
        Self { nodes, root: id }
    }

    /// Append a new node as the last child of `parent`
    pub fn append_child(
        &mut self,
        parent: &str,
        id: impl Into<String>,
        type_name: impl Into<String>,
        payload: NodePayload,
    ) -> Result<(), DictionaryError> {
        let id = id.into();
        if !self.nodes.contains_key(parent) {
            return Err(DictionaryError::UnknownId(parent.to_string()));
        }
        self.nodes.insert(
            id.clone(),
            Node {
                id: id.clone(),
                parent: Some(parent.to_string()),
                children: Vec::new(),
                type_name: type_name.into(),
                payload,
            },
        );
        self.nodes
            .get_mut(parent)
            .map(|p| p.children.push(id))
            .ok_or_else(|| DictionaryError::UnknownId(parent.to_string()))
    }

    pub fn root_id(&self) -> &str {
        &self.root
    }

    pub fn root(&self) -> &Node {
        // The constructor guarantees the root entry exists
        &self.nodes[&self.root]
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn require(&self, id: &str) -> Result<&Node, DictionaryError> {
        self.nodes
            .get(id)
            .ok_or_else(|| DictionaryError::UnknownId(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Child nodes of `id`, in document order
    pub fn children_of<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Node> + 'a {
        let child_ids = self
            .nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[]);
        child_ids.iter().filter_map(move |c| self.nodes.get(c))
    }

    /// Index of `id` within its parent's child list; the root sits at 0
    pub fn sibling_position(&self, id: &str) -> Result<usize, DictionaryError> {
        let node = self.require(id)?;
        match &node.parent {
            None => Ok(0),
            Some(parent) => {
                let parent = self.require(parent)?;
                parent
                    .children
                    .iter()
                    .position(|c| c == id)
                    .ok_or_else(|| DictionaryError::DetachedChild {
                        parent: parent.id.clone(),
                        child: id.to_string(),
                    })
            }
        }
    }

    /// Verify the structural invariants: every non-root node is referenced by
    /// exactly its parent, parent/child references are mutual, and every node
    /// is reachable from the root (which also rules out cycles).
    pub fn validate(&self) -> Result<(), DictionaryError> {
        let mut seen_as_child: HashSet<&str> = HashSet::new();
        for node in self.nodes.values() {
            for child_id in &node.children {
                if !seen_as_child.insert(child_id.as_str()) {
                    return Err(DictionaryError::DuplicateChild(child_id.clone()));
                }
                let child = self.require(child_id)?;
                if child.parent.as_deref() != Some(node.id.as_str()) {
                    return Err(DictionaryError::ParentMismatch {
                        parent: node.id.clone(),
                        child: child_id.clone(),
                    });
                }
            }
        }

        let mut reachable: HashSet<&str> = HashSet::new();
        let mut stack = vec![self.root.as_str()];
        while let Some(id) = stack.pop() {
            if reachable.insert(id) {
                if let Some(node) = self.nodes.get(id) {
                    stack.extend(node.children.iter().map(String::as_str));
                }
            }
        }
        for id in self.nodes.keys() {
            if !reachable.contains(id.as_str()) {
                return Err(DictionaryError::Unreachable(id.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NodeDictionary {
        let mut dict = NodeDictionary::with_root("root-1", "div", NodePayload::empty_element());
        dict.append_child("root-1", "root-2", "p", NodePayload::empty_element())
            .unwrap();
        dict.append_child("root-2", "root-3", TEXT_TYPE, NodePayload::text("hello"))
            .unwrap();
        dict.append_child("root-1", "root-4", "span", NodePayload::empty_element())
            .unwrap();
        dict
    }

    #[test]
    fn test_append_child_links_both_ways() {
        let dict = sample();
        assert_eq!(dict.len(), 4);
        assert_eq!(dict.root().children, vec!["root-2", "root-4"]);
        assert_eq!(dict.get("root-3").unwrap().parent.as_deref(), Some("root-2"));
    }

    #[test]
    fn test_sibling_positions() {
        let dict = sample();
        assert_eq!(dict.sibling_position("root-1").unwrap(), 0);
        assert_eq!(dict.sibling_position("root-2").unwrap(), 0);
        assert_eq!(dict.sibling_position("root-4").unwrap(), 1);
    }

    #[test]
    fn test_require_unknown_id() {
        let dict = sample();
        assert_eq!(
            dict.require("nope").unwrap_err(),
            DictionaryError::UnknownId("nope".to_string())
        );
    }

    #[test]
    fn test_validate_accepts_well_formed_tree() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_serde_round_trip() {
        let dict = sample();
        let json = serde_json::to_string(&dict).unwrap();
        let back: NodeDictionary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dict);
    }
}
