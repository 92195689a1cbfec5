//! # Edit session
//!
//! One session is the single owner of the authoritative page tree, the
//! history stacks, and the selection record. Everything the presentation
//! layer does flows through here:
//!
//! ```text
//! UI event → Mutation::apply (traversal + rewrite)
//!          → HistoryLog::commit (pre-mutation snapshot)
//!          → Selection::resync (re-resolve against the new tree)
//! ```
//!
//! All edits are serialized through this one owner; the core has no
//! background work and no concurrent mutation. Selection re-resolution is
//! an explicit step after every tree replacement, not a reactive binding.

use pagecraft_model::{Block, IdGenerator, KindRegistry};

use crate::errors::EditorError;
use crate::history::HistoryLog;
use crate::mutations::{EditContext, Mutation, Outcome};
use crate::selection::Selection;

/// An editing session for one page.
pub struct EditSession {
    /// Session identifier. Also seeds the id generator.
    pub id: String,

    roots: Vec<Block>,
    /// Increments on every committed mutation and every undo/redo step.
    version: u64,
    history: HistoryLog,
    selection: Selection,
    ids: IdGenerator,
    registry: KindRegistry,
}

impl EditSession {
    /// Start a session over an empty page.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_tree(id, Vec::new())
    }

    /// Start a session over an existing tree (deserialized by a
    /// collaborator; persistence itself lives outside the core).
    pub fn with_tree(id: impl Into<String>, roots: Vec<Block>) -> Self {
        let id = id.into();
        let mut ids = IdGenerator::new(&id);
        // A resumed session must never re-issue an id the tree already
        // holds.
        let existing = crate::traversal::collect_ids(&roots);
        ids.skip_past(existing.iter().map(String::as_str));
        Self {
            id,
            roots,
            version: 0,
            history: HistoryLog::new(),
            selection: Selection::new(),
            ids,
            registry: KindRegistry::with_builtin_kinds(),
        }
    }

    pub fn tree(&self) -> &[Block] {
        &self.roots
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Apply a mutation.
    ///
    /// The pre-mutation tree is snapshotted first; the snapshot is only
    /// committed to history when the mutation actually applied, so no-ops
    /// never occupy an undo level. Afterwards the selection is
    /// re-resolved, honoring the mutation's selection hint (inserts and
    /// duplicates select the new block).
    pub fn apply(&mut self, mutation: Mutation) -> Result<Outcome, EditorError> {
        let prior = self.roots.clone();

        let mut cx = EditContext {
            ids: &mut self.ids,
            registry: &self.registry,
            active_slot: self.selection.active_slot().map(str::to_string),
        };
        let outcome = mutation.apply(&mut self.roots, &mut cx)?;

        match &outcome {
            Outcome::Applied { select, .. } => {
                self.history.commit(prior);
                self.version += 1;
                match select {
                    Some(id) => self.selection.select(&self.roots, id),
                    None => self.selection.resync(&self.roots),
                }
            }
            Outcome::Noop { .. } => {}
        }
        Ok(outcome)
    }

    /// Step back one committed mutation. Returns `false` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo(&mut self.roots);
        if moved {
            self.version += 1;
            self.selection.resync(&self.roots);
        }
        moved
    }

    /// Step forward one undone mutation. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo(&mut self.roots);
        if moved {
            self.version += 1;
            self.selection.resync(&self.roots);
        }
        moved
    }

    pub fn select_node(&mut self, id: &str) {
        self.selection.select(&self.roots, id);
    }

    pub fn select_item(&mut self, node_id: &str, item_id: &str) {
        self.selection.select_item(&self.roots, node_id, item_id);
    }

    pub fn is_item_selected(&self, node_id: &str, item_id: &str) -> bool {
        self.selection.is_item_selected(node_id, item_id)
    }

    pub fn set_active_slot(&mut self, slot: Option<String>) {
        self.selection.set_active_slot(slot);
    }
}
