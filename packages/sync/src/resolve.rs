//! Active-id resolution across reparses.
//!
//! A reparse reassigns every node id, so "the node the user is focused on"
//! has to be re-found structurally: a node is identified by the chain of
//! (type, position-among-siblings) pairs from the root down to it, and the
//! old chain is matched against the new dictionary by longest prefix.

use braid_model::NodeDictionary;
use serde::{Deserialize, Serialize};

/// One step of an ancestor chain: structural identity, not id identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub type_name: String,
    /// Index within the parent's child list; 0 for the root
    pub sibling_position: usize,
}

/// Ancestor chain for `id`, ordered root-first and including the node itself.
///
/// Ids absent from the dictionary yield an empty chain, which resolves to the
/// root downstream.
pub fn ancestor_chain(id: &str, dict: &NodeDictionary) -> Vec<ChainLink> {
    let mut chain = Vec::new();
    let mut cursor = dict.get(id);

    while let Some(node) = cursor {
        let sibling_position = dict.sibling_position(&node.id).unwrap_or(0);
        chain.push(ChainLink {
            type_name: node.type_name.clone(),
            sibling_position,
        });
        cursor = node.parent.as_deref().and_then(|p| dict.get(p));
    }

    chain.reverse();
    chain
}

/// Find the id in `new_dict` whose ancestor chain matches `chain` by the
/// longest prefix. Matching starts at the root and descends one link at a
/// time; the deepest node reached wins. Never fails: when nothing below the
/// root matches, the new root id is the answer.
pub fn resolve_active_id(chain: &[ChainLink], new_dict: &NodeDictionary) -> String {
    let root = new_dict.root();
    let mut current = root;

    // The head link must describe the root; anything else degrades immediately
    match chain.first() {
        Some(head) if head.type_name == root.type_name => {}
        _ => return root.id.clone(),
    }

    for link in &chain[1..] {
        let candidate = current
            .children
            .get(link.sibling_position)
            .and_then(|id| new_dict.get(id))
            .filter(|child| child.type_name == link.type_name);

        match candidate {
            Some(child) => current = child,
            None => break,
        }
    }

    current.id.clone()
}
