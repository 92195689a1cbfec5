//! # Pagecraft Editor
//!
//! Core document-editing engine for Pagecraft.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: block tree + kinds + factory         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: session lifecycle + mutations       │
//! │  - Locate nodes across heterogeneous shapes │
//! │  - Apply mutations with validation          │
//! │  - Snapshot history, bounded undo/redo      │
//! │  - Keep selection consistent across rewrites│
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ evaluator: visibility gating for renderers  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is the source of truth**: selection and history are
//!    derived records, re-synchronized after every replacement
//! 2. **Snapshots over diffs**: history stores full deep copies taken
//!    before each committed mutation
//! 3. **Defensive no-ops**: a mutation that cannot apply leaves the tree
//!    byte-for-byte unchanged and logs a diagnostic; nothing partially
//!    applies
//! 4. **Single owner**: one [`EditSession`] holds the authoritative tree,
//!    the history stacks, and the selection record
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_editor::{EditSession, Mutation};
//!
//! let mut session = EditSession::new("landing-page");
//!
//! session.apply(Mutation::InsertAtEnd {
//!     kind: "hero".to_string(),
//! }).unwrap();
//!
//! let hero_id = session.selection().node_id().unwrap().to_string();
//! session.apply(Mutation::UpdatePayload {
//!     node_id: hero_id,
//!     patch: serde_json::json!({ "heading": "Welcome" }),
//! }).unwrap();
//!
//! session.undo();
//! session.redo();
//! ```

mod errors;
mod history;
mod mutations;
mod selection;
mod session;
pub mod traversal;

pub use errors::EditorError;
pub use history::{HistoryLog, Snapshot};
pub use mutations::{
    CountChange, Direction, EditContext, InsertPosition, Mutation, MutationError, Outcome,
};
pub use selection::{SelectedItem, Selection};
pub use session::EditSession;

// Re-export model types for convenience
pub use pagecraft_model::{Block, BlockKind, Item, KindRegistry, Payload, VisibilityRules};
