//! # Selection state
//!
//! Tracks which block (and, within it, which payload item) the user is
//! focused on. Object identity changes on every tree rewrite, so the
//! selection re-resolves by id after each replacement instead of holding
//! references into the old tree.

use pagecraft_model::Block;
use tracing::warn;

use crate::traversal;

/// Item selection scoped to its owning block.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedItem {
    pub node_id: String,
    pub item_id: String,
}

/// The session's selection record.
///
/// `active_slot` remembers which pane of a multi-slot container the user
/// last worked in; container inserts without an explicit slot target it.
#[derive(Debug, Default)]
pub struct Selection {
    node_id: Option<String>,
    parent_id: Option<String>,
    item: Option<SelectedItem>,
    active_slot: Option<String>,
    snapshot: Option<Block>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn selected_item(&self) -> Option<&SelectedItem> {
        self.item.as_ref()
    }

    pub fn active_slot(&self) -> Option<&str> {
        self.active_slot.as_deref()
    }

    /// Clone of the selected block as of the last resync. Consumers read
    /// this instead of searching the tree again.
    pub fn block(&self) -> Option<&Block> {
        self.snapshot.as_ref()
    }

    /// Drop the node selection. The active slot survives; it describes
    /// which pane is open, not which block is selected, and every use is
    /// re-validated against the current tree anyway.
    pub fn clear(&mut self) {
        self.node_id = None;
        self.parent_id = None;
        self.item = None;
        self.snapshot = None;
    }

    /// Select a block by id. Selecting an id absent from the tree clears
    /// the selection; the record never references a node that does not
    /// exist.
    pub fn select(&mut self, roots: &[Block], id: &str) {
        match traversal::locate(roots, id) {
            None => {
                warn!(node_id = id, "selection target not found; clearing");
                self.clear();
            }
            Some(location) => {
                self.node_id = Some(id.to_string());
                self.parent_id = location.parent_id;
                self.item = None;
                if location.slot_id.is_some() {
                    self.active_slot = location.slot_id;
                }
                self.snapshot = traversal::find(roots, id).cloned();
            }
        }
    }

    /// Select an item together with its owning block. The owning block is
    /// resolved and selected first, so item selection never exists without
    /// a valid node selection.
    pub fn select_item(&mut self, roots: &[Block], node_id: &str, item_id: &str) {
        let Some(block) = traversal::find(roots, node_id) else {
            warn!(node_id, "select-item owner not found");
            return;
        };
        let owns_item = block
            .payload
            .items()
            .is_some_and(|items| items.iter().any(|item| item.id == item_id));
        if !owns_item {
            warn!(node_id, item_id, "select-item target not found on owner");
            return;
        }

        self.select(roots, node_id);
        self.item = Some(SelectedItem {
            node_id: node_id.to_string(),
            item_id: item_id.to_string(),
        });
    }

    pub fn is_item_selected(&self, node_id: &str, item_id: &str) -> bool {
        self.item
            .as_ref()
            .is_some_and(|selected| selected.node_id == node_id && selected.item_id == item_id)
    }

    pub fn set_active_slot(&mut self, slot: Option<String>) {
        self.active_slot = slot;
    }

    /// Re-resolve against a replaced tree (mutation, undo, redo).
    ///
    /// Clears everything when the selected id disappeared; otherwise
    /// refreshes the parent id, drops a vanished item selection, and
    /// replaces the held block clone when the block changed.
    pub fn resync(&mut self, roots: &[Block]) {
        let Some(id) = self.node_id.clone() else {
            return;
        };

        match traversal::locate(roots, &id) {
            None => self.clear(),
            Some(location) => {
                self.parent_id = location.parent_id;

                let Some(block) = traversal::find(roots, &id) else {
                    self.clear();
                    return;
                };

                if let Some(selected) = &self.item {
                    let still_there = block
                        .payload
                        .items()
                        .is_some_and(|items| items.iter().any(|item| item.id == selected.item_id));
                    if !still_there {
                        self.item = None;
                    }
                }

                if self.snapshot.as_ref() != Some(block) {
                    self.snapshot = Some(block.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_model::{create_block, IdGenerator, KindRegistry, Payload};

    fn carousel_tree() -> (Vec<Block>, String, String) {
        let registry = KindRegistry::with_builtin_kinds();
        let mut ids = IdGenerator::new("selection-test");

        let mut carousel = create_block("carousel", &registry, &mut ids).unwrap();
        let slide_id = ids.new_id();
        if let Payload::Carousel { slides } = &mut carousel.payload {
            slides.push(pagecraft_model::Item {
                id: slide_id.clone(),
                fields: serde_json::Map::new(),
            });
        }
        let carousel_id = carousel.id.clone();
        (vec![carousel], carousel_id, slide_id)
    }

    #[test]
    fn test_select_missing_id_clears() {
        let (roots, carousel_id, _) = carousel_tree();
        let mut selection = Selection::new();

        selection.select(&roots, &carousel_id);
        assert_eq!(selection.node_id(), Some(carousel_id.as_str()));

        selection.select(&roots, "ghost");
        assert_eq!(selection.node_id(), None);
        assert!(selection.block().is_none());
    }

    #[test]
    fn test_select_item_requires_owner() {
        let (roots, carousel_id, slide_id) = carousel_tree();
        let mut selection = Selection::new();

        selection.select_item(&roots, &carousel_id, &slide_id);
        assert_eq!(selection.node_id(), Some(carousel_id.as_str()));
        assert!(selection.is_item_selected(&carousel_id, &slide_id));

        // Unknown item leaves the record untouched.
        let mut other = Selection::new();
        other.select_item(&roots, &carousel_id, "ghost-item");
        assert_eq!(other.node_id(), None);
        assert!(!other.is_item_selected(&carousel_id, "ghost-item"));
    }

    #[test]
    fn test_resync_clears_on_disappearance() {
        let (mut roots, carousel_id, _) = carousel_tree();
        let mut selection = Selection::new();
        selection.select(&roots, &carousel_id);

        roots.clear();
        selection.resync(&roots);

        assert_eq!(selection.node_id(), None);
        assert_eq!(selection.parent_id(), None);
        assert!(selection.selected_item().is_none());
    }

    #[test]
    fn test_resync_refreshes_changed_block() {
        let (mut roots, carousel_id, slide_id) = carousel_tree();
        let mut selection = Selection::new();
        selection.select_item(&roots, &carousel_id, &slide_id);

        // Mutate the payload out from under the held clone.
        if let Payload::Carousel { slides } = &mut roots[0].payload {
            slides.clear();
        }
        selection.resync(&roots);

        assert_eq!(selection.node_id(), Some(carousel_id.as_str()));
        // Item vanished with the payload change.
        assert!(selection.selected_item().is_none());
        // Held clone reflects the new payload.
        let held = selection.block().unwrap();
        assert_eq!(held.payload.items().map(|items| items.len()), Some(0));
    }
}
