//! # Braid Sync
//!
//! Bidirectional synchronization between the Braid node dictionary and a
//! text-editing surface.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ message channel: initialize / data-changed  │
//! │                  navigation / schema-changed│
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ sync: SyncAdapter state machine             │
//! │  - hold dictionary + schemas + active id    │
//! │  - refresh text snapshot on external change │
//! │  - parse local edits, re-resolve active id  │
//! │  - suppress echoes by originator tag        │
//! │  - dispatch registered actions              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ markup: serialize / parse / position_of     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core principles
//!
//! 1. **The dictionary is the source of truth**: the text snapshot is a
//!    derived view, regenerated wholesale, never patched incrementally.
//! 2. **One message at a time**: every operation is a finite synchronous
//!    computation; the surrounding channel guarantees ordering.
//! 3. **Resolution never fails**: when an edit reshapes the tree, focus
//!    degrades to the deepest structurally-matching ancestor, ultimately the
//!    root, rather than erroring on every keystroke.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use braid_sync::{Message, SyncAdapter};
//!
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut adapter = SyncAdapter::new(dictionary, schemas, active_id, tx);
//!
//! // the editor buffer changed locally
//! adapter.set_text_snapshot(buffer_lines, false)?;
//! // → rx now carries an initialize notification tagged with our origin id
//!
//! // another surface changed the document
//! adapter.handle_message(incoming);
//! let caret = adapter.position_for_id(None)?;
//! ```

mod actions;
mod adapter;
mod errors;
mod messages;
mod resolve;

pub use actions::{ActionContext, ActionRegistry, SyncAction};
pub use adapter::{AdapterState, SyncAdapter};
pub use errors::SyncError;
pub use messages::{Message, MessageKind, ADAPTER_ORIGIN_ID};
pub use resolve::{ancestor_chain, resolve_active_id, ChainLink};

// Re-export the collaborator surface for convenience
pub use braid_markup::Position;
pub use braid_model::{NodeDictionary, SchemaSet};
