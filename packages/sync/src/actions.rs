//! # Action Registry
//!
//! Lets callers attach behavior to incoming message kinds without the adapter
//! knowing about them at compile time. Each registered action names the kind
//! it fires on; when the adapter processes a matching externally-origined
//! message it invokes the actions in registration order, handing each one
//! mutable access to the adapter's exposed operations.

use crate::adapter::AdapterState;
use crate::messages::MessageKind;
use std::fmt;

/// Operations available to an action while it runs
pub struct ActionContext<'a> {
    /// The kind that fired
    pub kind: MessageKind,
    /// The adapter's exposed operations: snapshot get/set, position lookup
    pub adapter: &'a mut AdapterState,
}

type ActionCallback = Box<dyn FnMut(ActionContext<'_>)>;

/// A single registered reaction
pub struct SyncAction {
    id: String,
    kind: MessageKind,
    callback: ActionCallback,
}

impl SyncAction {
    pub fn new(
        id: impl Into<String>,
        kind: MessageKind,
        callback: impl FnMut(ActionContext<'_>) + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            callback: Box::new(callback),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn matches(&self, kind: MessageKind) -> bool {
        self.kind == kind
    }

    fn invoke(&mut self, adapter: &mut AdapterState) {
        (self.callback)(ActionContext {
            kind: self.kind,
            adapter,
        });
    }
}

impl fmt::Debug for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncAction")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Ordered set of registered actions
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<SyncAction>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, action: SyncAction) {
        self.actions.push(action);
    }

    pub fn get(&self, id: &str) -> Option<&SyncAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Invoke every action whose kind matches, in registration order
    pub fn dispatch(&mut self, kind: MessageKind, adapter: &mut AdapterState) {
        for action in &mut self.actions {
            if action.matches(kind) {
                action.invoke(adapter);
            }
        }
    }
}
