use braid_model::{NodeDictionary, SchemaSet};
use serde::{Deserialize, Serialize};

/// Originator tag stamped on notifications the adapter emits about its own
/// locally-parsed dictionaries. An incoming message carrying this tag is the
/// adapter's own echo and must not trigger re-serialization.
pub const ADAPTER_ORIGIN_ID: &str = "braid::text-sync-adapter";

/// Message kinds the adapter recognizes, used for action matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    Initialize,
    DataChanged,
    Navigation,
    SchemaChanged,
    Unknown,
}

/// A message on the document channel.
///
/// Each variant carries the payload subset that event kind is defined over.
/// Kinds this adapter does not recognize deserialize to `Unknown` and are
/// ignored rather than rejected, so newer peers can add message types freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Message {
    Initialize {
        dictionary: NodeDictionary,
        schemas: SchemaSet,
        active_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
    },
    DataChanged {
        dictionary: NodeDictionary,
        active_id: String,
    },
    Navigation {
        active_id: String,
    },
    SchemaChanged {
        schemas: SchemaSet,
    },
    #[serde(other)]
    Unknown,
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Initialize { .. } => MessageKind::Initialize,
            Message::DataChanged { .. } => MessageKind::DataChanged,
            Message::Navigation { .. } => MessageKind::Navigation,
            Message::SchemaChanged { .. } => MessageKind::SchemaChanged,
            Message::Unknown => MessageKind::Unknown,
        }
    }

    /// True when the message was emitted by this adapter itself
    pub fn is_self_originated(&self) -> bool {
        matches!(
            self,
            Message::Initialize {
                origin: Some(origin),
                ..
            } if origin == ADAPTER_ORIGIN_ID
        )
    }
}
