//! # Synchronization Adapter
//!
//! Keeps the structured node dictionary and the flat text buffer of an
//! editor surface consistent with each other, in both directions:
//!
//! - external dictionary changes arrive as messages and refresh the text
//!   snapshot through the serializer;
//! - local text edits are parsed back into a dictionary, the active id is
//!   re-resolved structurally, and a notification tagged with this adapter's
//!   origin id is emitted so the echo can be recognized and dropped.
//!
//! The adapter processes one message to completion at a time; every
//! collaborator call (serialize, parse, position mapping) is a synchronous
//! pure function.

use crate::actions::{ActionRegistry, SyncAction};
use crate::errors::SyncError;
use crate::messages::{Message, MessageKind, ADAPTER_ORIGIN_ID};
use crate::resolve::{ancestor_chain, resolve_active_id};
use braid_markup::{parse, position_of, serialize, Position};
use braid_model::{NodeDictionary, SchemaSet};
use tokio::sync::mpsc::UnboundedSender;

/// The adapter's held state and the operations exposed to registered actions.
///
/// Kept separate from the action registry so actions can borrow it mutably
/// while the registry is being iterated.
#[derive(Debug)]
pub struct AdapterState {
    dictionary: NodeDictionary,
    schemas: SchemaSet,
    active_id: String,
    lines: Vec<String>,
    outgoing: UnboundedSender<Message>,
}

impl AdapterState {
    /// The current text snapshot
    pub fn text_snapshot(&self) -> &[String] {
        &self.lines
    }

    pub fn dictionary(&self) -> &NodeDictionary {
        &self.dictionary
    }

    pub fn schemas(&self) -> &SchemaSet {
        &self.schemas
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// Accept a new flat text representation.
    ///
    /// The input is normalized by joining and re-splitting on line breaks and
    /// stored unconditionally, so the user's keystrokes survive even a failed
    /// parse. When `external` is true the dictionary was already updated over
    /// a separate channel and nothing else happens. Otherwise the text is
    /// parsed, the active id is re-resolved against the new dictionary, and
    /// one self-tagged `initialize` notification is emitted.
    pub fn set_text_snapshot(
        &mut self,
        lines: Vec<String>,
        external: bool,
    ) -> Result<(), SyncError> {
        self.lines = lines
            .concat()
            .split('\n')
            .map(str::to_string)
            .collect();

        if external {
            return Ok(());
        }

        let source: String = self.lines.iter().map(|line| line.trim_start()).collect();
        let parsed = parse(&source, &self.dictionary, &self.schemas)?;

        let chain = ancestor_chain(&self.active_id, &self.dictionary);
        self.active_id = resolve_active_id(&chain, &parsed);
        self.dictionary = parsed;

        self.post(Message::Initialize {
            dictionary: self.dictionary.clone(),
            schemas: self.schemas.clone(),
            active_id: self.active_id.clone(),
            origin: Some(ADAPTER_ORIGIN_ID.to_string()),
        });

        Ok(())
    }

    /// Position of the given node, or of the active node when none is given
    pub fn position_for_id(&self, id: Option<&str>) -> Result<Position, SyncError> {
        let id = id.unwrap_or(&self.active_id);
        Ok(position_of(id, &self.dictionary, &self.schemas, &self.lines)?)
    }

    fn post(&self, message: Message) {
        if self.outgoing.send(message).is_err() {
            // A detached consumer must not fail the adapter
            tracing::warn!("outgoing channel closed, dropping notification");
        }
    }
}

/// Message-driven state machine mediating one document
pub struct SyncAdapter {
    state: AdapterState,
    actions: ActionRegistry,
}

impl SyncAdapter {
    /// Create a settled adapter and serialize the initial snapshot eagerly.
    ///
    /// An `active_id` absent from the dictionary falls back to the root.
    pub fn new(
        dictionary: NodeDictionary,
        schemas: SchemaSet,
        active_id: impl Into<String>,
        outgoing: UnboundedSender<Message>,
    ) -> Self {
        let active_id = active_id.into();
        let active_id = if dictionary.contains(&active_id) {
            active_id
        } else {
            tracing::warn!(%active_id, "initial active id not in dictionary, using root");
            dictionary.root_id().to_string()
        };
        let lines = serialize(&dictionary, &schemas);

        Self {
            state: AdapterState {
                dictionary,
                schemas,
                active_id,
                lines,
                outgoing,
            },
            actions: ActionRegistry::new(),
        }
    }

    pub fn register_action(&mut self, action: SyncAction) {
        self.actions.register(action);
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn state(&self) -> &AdapterState {
        &self.state
    }

    pub fn text_snapshot(&self) -> &[String] {
        self.state.text_snapshot()
    }

    pub fn set_text_snapshot(
        &mut self,
        lines: Vec<String>,
        external: bool,
    ) -> Result<(), SyncError> {
        self.state.set_text_snapshot(lines, external)
    }

    pub fn position_for_id(&self, id: Option<&str>) -> Result<Position, SyncError> {
        self.state.position_for_id(id)
    }

    /// Handle one incoming message. Total over all kinds; never errors across
    /// the channel boundary.
    pub fn handle_message(&mut self, message: Message) {
        match message {
            Message::Initialize {
                dictionary,
                schemas,
                active_id,
                origin,
            } => {
                let external = origin.as_deref() != Some(ADAPTER_ORIGIN_ID);
                self.state.active_id = active_id;
                self.state.dictionary = dictionary;

                if external {
                    self.state.schemas = schemas;
                    self.state.lines = serialize(&self.state.dictionary, &self.state.schemas);
                    self.actions
                        .dispatch(MessageKind::Initialize, &mut self.state);
                } else {
                    tracing::debug!("suppressing echo of our own initialize");
                }
            }
            Message::DataChanged {
                dictionary,
                active_id,
            } => {
                self.state.active_id = active_id;
                self.state.dictionary = dictionary;
            }
            Message::Navigation { active_id } => {
                self.state.active_id = active_id;
            }
            Message::SchemaChanged { schemas } => {
                self.state.schemas = schemas;
            }
            Message::Unknown => {
                tracing::debug!("ignoring unrecognized message kind");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_model::{NodePayload, Schema, TEXT_TYPE};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn schemas() -> SchemaSet {
        SchemaSet::new()
            .with("div", Schema::default())
            .with("p", Schema::default())
    }

    fn fixture() -> (SyncAdapter, UnboundedReceiver<Message>) {
        // <p>hello</p>
        let mut dict = NodeDictionary::with_root("doc-1", "p", NodePayload::empty_element());
        dict.append_child("doc-1", "doc-2", TEXT_TYPE, NodePayload::text("hello"))
            .unwrap();

        let (tx, rx) = mpsc::unbounded_channel();
        (SyncAdapter::new(dict, schemas(), "doc-1", tx), rx)
    }

    #[test]
    fn test_initial_snapshot_is_serialized() {
        let (adapter, _rx) = fixture();
        assert_eq!(adapter.text_snapshot(), ["<p>hello</p>"]);
    }

    #[test]
    fn test_unknown_active_id_falls_back_to_root() {
        let dict = NodeDictionary::with_root("doc-1", "p", NodePayload::empty_element());
        let (tx, _rx) = mpsc::unbounded_channel();
        let adapter = SyncAdapter::new(dict, schemas(), "gone", tx);

        assert_eq!(adapter.state().active_id(), "doc-1");
    }

    #[test]
    fn test_external_snapshot_does_not_parse_or_emit() {
        let (mut adapter, mut rx) = fixture();
        let before = adapter.state().dictionary().clone();

        adapter
            .set_text_snapshot(vec!["<p>changed</p>".to_string()], true)
            .unwrap();

        assert_eq!(adapter.text_snapshot(), ["<p>changed</p>"]);
        assert_eq!(adapter.state().dictionary(), &before);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_snapshot_normalization_joins_and_resplits() {
        let (mut adapter, _rx) = fixture();

        adapter
            .set_text_snapshot(vec!["<p>he".to_string(), "llo</p>\n".to_string()], true)
            .unwrap();

        assert_eq!(adapter.text_snapshot(), ["<p>hello</p>", ""]);
    }

    #[test]
    fn test_parse_failure_keeps_snapshot_and_state() {
        let (mut adapter, mut rx) = fixture();
        let before = adapter.state().dictionary().clone();

        let err = adapter
            .set_text_snapshot(vec!["<p>broken".to_string()], false)
            .unwrap_err();

        assert!(matches!(err, SyncError::Parse(_)));
        // keystrokes kept, dictionary untouched, nothing emitted
        assert_eq!(adapter.text_snapshot(), ["<p>broken"]);
        assert_eq!(adapter.state().dictionary(), &before);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_navigation_replaces_active_id_only() {
        let (mut adapter, _rx) = fixture();
        let snapshot = adapter.text_snapshot().to_vec();

        adapter.handle_message(Message::Navigation {
            active_id: "doc-2".to_string(),
        });

        assert_eq!(adapter.state().active_id(), "doc-2");
        assert_eq!(adapter.text_snapshot(), snapshot);
    }

    #[test]
    fn test_schema_change_replaces_schemas_only() {
        let (mut adapter, _rx) = fixture();
        let snapshot = adapter.text_snapshot().to_vec();

        let richer = schemas().with("span", Schema::default());
        adapter.handle_message(Message::SchemaChanged {
            schemas: richer.clone(),
        });

        assert_eq!(adapter.state().schemas(), &richer);
        assert_eq!(adapter.text_snapshot(), snapshot);
    }

    #[test]
    fn test_unknown_message_is_a_noop() {
        let (mut adapter, _rx) = fixture();
        let before_dict = adapter.state().dictionary().clone();
        let before_snapshot = adapter.text_snapshot().to_vec();

        adapter.handle_message(Message::Unknown);

        assert_eq!(adapter.state().dictionary(), &before_dict);
        assert_eq!(adapter.text_snapshot(), before_snapshot);
    }

    #[test]
    fn test_position_for_active_id_by_default() {
        let (adapter, _rx) = fixture();
        let pos = adapter.position_for_id(None).unwrap();
        assert_eq!(pos, Position { line: 1, column: 4 });
    }

    #[test]
    fn test_position_for_missing_id() {
        let (adapter, _rx) = fixture();
        let err = adapter.position_for_id(Some("nonexistent")).unwrap_err();
        assert!(matches!(err, SyncError::IdNotFound(_)));
    }
}
