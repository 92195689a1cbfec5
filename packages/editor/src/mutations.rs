//! # Block mutations
//!
//! High-level semantic operations on a page tree.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation represents one user-visible
//!    semantic operation
//! 2. **Validated**: structural constraints are checked before anything
//!    is spliced
//! 3. **Silent-safe**: an operation that cannot apply is a no-op with a
//!    logged diagnostic; the tree is always left in its last valid state
//! 4. **Not-found is control flow**: a missing target id produces
//!    [`Outcome::Noop`], never an error
//!
//! The only hard error is an unrecognized block kind, which aborts an
//! insert before the tree is touched.

use std::collections::HashMap;

use pagecraft_model::{
    default_block, Block, BlockKind, IdGenerator, Item, KindRegistry, ModelError, Payload,
    StyleMap, VisibilityRules, MAX_COLUMNS, MIN_COLUMNS,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::traversal;

/// Direction for sibling and item reordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Placement relative to a reference node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Before,
    After,
}

/// Grow or shrink a bounded container by one slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountChange {
    Increase,
    Decrease,
}

/// Semantic mutations (intent-preserving operations).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Shallow-merge a patch into the node's payload. The `kind` tag is
    /// immune; a patch that no longer deserializes is rejected whole.
    UpdatePayload { node_id: String, patch: Value },

    /// Shallow-merge a patch into the node's style map. A `null` value
    /// clears the property.
    UpdateStyle { node_id: String, patch: Value },

    /// Shallow-merge a patch into the node's visibility rules. A `null`
    /// value clears the rule field.
    UpdateVisibility { node_id: String, patch: Value },

    /// Swap the node with its neighbor in its sibling list.
    MoveNode { node_id: String, direction: Direction },

    /// Splice the node out of its container.
    DeleteNode { node_id: String },

    /// Deep-clone the subtree with fresh ids everywhere and insert the
    /// clone immediately after the original.
    DuplicateNode { node_id: String },

    /// Create a new block and splice it next to the reference node, in
    /// the reference's exact container.
    InsertRelative {
        kind: String,
        reference_id: String,
        position: InsertPosition,
    },

    /// Create a new block and append it to the root list.
    InsertAtEnd { kind: String },

    /// Create a new block inside a container. Multi-slot containers
    /// resolve the target pane as: explicit `slot_id`, then the session's
    /// active slot, then the first tab.
    InsertIntoContainer {
        kind: String,
        container_id: String,
        slot_id: Option<String>,
    },

    /// Append a default item to the node's item list.
    AddItem { node_id: String },

    /// Shallow-merge a patch into one item's fields. The item id is
    /// immune; a `null` value clears the field.
    UpdateItem {
        node_id: String,
        item_id: String,
        patch: Value,
    },

    /// Remove one item. Removing a tab header also drops its pane,
    /// subtree included.
    RemoveItem { node_id: String, item_id: String },

    /// Swap the item at `index` with its neighbor.
    MoveItem {
        node_id: String,
        index: usize,
        direction: Direction,
    },

    /// Grow or shrink a `columns` row by one column, within its
    /// structural bounds.
    SetColumnCount {
        container_id: String,
        change: CountChange,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Unknown block kind: {0}")]
    UnknownKind(String),
}

impl From<ModelError> for MutationError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownKind(kind) => MutationError::UnknownKind(kind),
        }
    }
}

/// Collaborators a mutation needs while applying.
pub struct EditContext<'a> {
    pub ids: &'a mut IdGenerator,
    pub registry: &'a KindRegistry,
    /// Pane the user is currently looking at, consulted when a container
    /// insert names no slot.
    pub active_slot: Option<String>,
}

/// Result of applying a mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The tree was rewritten.
    Applied {
        /// Node the session should select afterwards.
        select: Option<String>,
        /// Id of a freshly added payload item.
        new_item_id: Option<String>,
    },
    /// The mutation had no effect (target missing, constraint refused,
    /// slot unresolvable). The tree is untouched.
    Noop { reason: String },
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }

    fn applied() -> Self {
        Outcome::Applied {
            select: None,
            new_item_id: None,
        }
    }

    fn applied_select(id: String) -> Self {
        Outcome::Applied {
            select: Some(id),
            new_item_id: None,
        }
    }
}

fn skip(reason: String) -> Outcome {
    warn!("mutation skipped: {}", reason);
    Outcome::Noop { reason }
}

impl Mutation {
    /// Apply the mutation to `roots`, rewriting it in place.
    ///
    /// Callers that need the prior tree (the session does, for history)
    /// clone before calling. Every failure path short-circuits before the
    /// first splice, so a `Noop` outcome guarantees an untouched tree.
    pub fn apply(
        &self,
        roots: &mut Vec<Block>,
        cx: &mut EditContext,
    ) -> Result<Outcome, MutationError> {
        match self {
            Mutation::UpdatePayload { node_id, patch } => {
                Ok(Self::apply_update_payload(roots, node_id, patch))
            }
            Mutation::UpdateStyle { node_id, patch } => {
                Ok(Self::apply_update_style(roots, node_id, patch))
            }
            Mutation::UpdateVisibility { node_id, patch } => {
                Ok(Self::apply_update_visibility(roots, node_id, patch))
            }
            Mutation::MoveNode { node_id, direction } => {
                Ok(Self::apply_move(roots, node_id, *direction))
            }
            Mutation::DeleteNode { node_id } => Ok(Self::apply_delete(roots, node_id)),
            Mutation::DuplicateNode { node_id } => Ok(Self::apply_duplicate(roots, node_id, cx)),
            Mutation::InsertRelative {
                kind,
                reference_id,
                position,
            } => Self::apply_insert_relative(roots, kind, reference_id, *position, cx),
            Mutation::InsertAtEnd { kind } => Self::apply_insert_at_end(roots, kind, cx),
            Mutation::InsertIntoContainer {
                kind,
                container_id,
                slot_id,
            } => Self::apply_insert_into_container(roots, kind, container_id, slot_id.as_deref(), cx),
            Mutation::AddItem { node_id } => Ok(Self::apply_add_item(roots, node_id, cx)),
            Mutation::UpdateItem {
                node_id,
                item_id,
                patch,
            } => Ok(Self::apply_update_item(roots, node_id, item_id, patch)),
            Mutation::RemoveItem { node_id, item_id } => {
                Ok(Self::apply_remove_item(roots, node_id, item_id))
            }
            Mutation::MoveItem {
                node_id,
                index,
                direction,
            } => Ok(Self::apply_move_item(roots, node_id, *index, *direction)),
            Mutation::SetColumnCount {
                container_id,
                change,
            } => Ok(Self::apply_set_column_count(roots, container_id, *change, cx)),
        }
    }

    fn apply_update_payload(roots: &mut Vec<Block>, node_id: &str, patch: &Value) -> Outcome {
        let Some(block) = traversal::find_mut(roots, node_id) else {
            return skip(format!("update-payload target not found: {}", node_id));
        };
        let Value::Object(patch) = patch else {
            return skip(format!("payload patch for {} is not an object", node_id));
        };

        let mut merged = match serde_json::to_value(&block.payload) {
            Ok(value) => value,
            Err(err) => return skip(format!("payload of {} failed to serialize: {}", node_id, err)),
        };
        if let Value::Object(target) = &mut merged {
            for (key, value) in patch {
                // kind is immutable after creation
                if key == "kind" {
                    continue;
                }
                target.insert(key.clone(), value.clone());
            }
        }

        match serde_json::from_value::<Payload>(merged) {
            Ok(mut payload) => {
                payload.normalize();
                block.payload = payload;
                Outcome::applied()
            }
            Err(err) => skip(format!("payload patch for {} rejected: {}", node_id, err)),
        }
    }

    fn apply_update_style(roots: &mut Vec<Block>, node_id: &str, patch: &Value) -> Outcome {
        let Some(block) = traversal::find_mut(roots, node_id) else {
            return skip(format!("update-style target not found: {}", node_id));
        };
        let Value::Object(patch) = patch else {
            return skip(format!("style patch for {} is not an object", node_id));
        };

        let style = block.style.get_or_insert_with(StyleMap::new);
        for (key, value) in patch {
            if value.is_null() {
                style.remove(key);
            } else {
                style.insert(key.clone(), value.clone());
            }
        }
        Outcome::applied()
    }

    fn apply_update_visibility(roots: &mut Vec<Block>, node_id: &str, patch: &Value) -> Outcome {
        let Some(block) = traversal::find_mut(roots, node_id) else {
            return skip(format!("update-visibility target not found: {}", node_id));
        };
        let Value::Object(patch) = patch else {
            return skip(format!("visibility patch for {} is not an object", node_id));
        };

        let current = block.visibility.clone().unwrap_or_default();
        let mut merged = match serde_json::to_value(&current) {
            Ok(value) => value,
            Err(err) => {
                return skip(format!(
                    "visibility rules of {} failed to serialize: {}",
                    node_id, err
                ))
            }
        };
        if let Value::Object(target) = &mut merged {
            for (key, value) in patch {
                target.insert(key.clone(), value.clone());
            }
        }

        match serde_json::from_value::<VisibilityRules>(merged) {
            Ok(rules) => {
                block.visibility = if rules.is_empty() { None } else { Some(rules) };
                Outcome::applied()
            }
            Err(err) => skip(format!(
                "visibility patch for {} rejected: {}",
                node_id, err
            )),
        }
    }

    fn apply_move(roots: &mut Vec<Block>, node_id: &str, direction: Direction) -> Outcome {
        let Some(location) = traversal::locate(roots, node_id) else {
            return skip(format!("move target not found: {}", node_id));
        };
        let Some(list) = traversal::sibling_list_mut(roots, &location) else {
            return skip(format!("sibling list of {} unavailable", node_id));
        };

        let target = match direction {
            Direction::Up => location.index.checked_sub(1),
            Direction::Down => {
                let next = location.index + 1;
                (next < list.len()).then_some(next)
            }
        };
        let Some(target) = target else {
            return skip(format!("move out of bounds for {}", node_id));
        };

        list.swap(location.index, target);
        Outcome::applied()
    }

    fn apply_delete(roots: &mut Vec<Block>, node_id: &str) -> Outcome {
        let Some(location) = traversal::locate(roots, node_id) else {
            return skip(format!("delete target not found: {}", node_id));
        };

        // Structural-minimum guard: a columns row never drops below its
        // minimum column count. The UI disables the control first; this is
        // the backstop.
        if let Some(parent_id) = &location.parent_id {
            if let Some(parent) = traversal::find(roots, parent_id) {
                if parent.kind() == BlockKind::Columns {
                    let count = parent.children().map_or(0, |children| children.len());
                    if count <= MIN_COLUMNS {
                        return skip(format!(
                            "columns {} at structural minimum {}; refusing delete of {}",
                            parent_id, MIN_COLUMNS, node_id
                        ));
                    }
                }
            }
        }

        let Some(list) = traversal::sibling_list_mut(roots, &location) else {
            return skip(format!("sibling list of {} unavailable", node_id));
        };
        list.remove(location.index);
        Outcome::applied()
    }

    fn apply_duplicate(roots: &mut Vec<Block>, node_id: &str, cx: &mut EditContext) -> Outcome {
        let Some(location) = traversal::locate(roots, node_id) else {
            return skip(format!("duplicate target not found: {}", node_id));
        };
        let Some(list) = traversal::sibling_list_mut(roots, &location) else {
            return skip(format!("sibling list of {} unavailable", node_id));
        };

        let mut clone = list[location.index].clone();
        reassign_ids(&mut clone, cx.ids);
        let clone_id = clone.id.clone();
        list.insert(location.index + 1, clone);
        Outcome::applied_select(clone_id)
    }

    fn apply_insert_relative(
        roots: &mut Vec<Block>,
        kind: &str,
        reference_id: &str,
        position: InsertPosition,
        cx: &mut EditContext,
    ) -> Result<Outcome, MutationError> {
        let kind = cx.registry.resolve(kind)?;

        let Some(location) = traversal::locate(roots, reference_id) else {
            return Ok(skip(format!(
                "insert reference not found: {}",
                reference_id
            )));
        };

        let legal = match &location.parent_id {
            None => cx.registry.allowed_at_root(kind),
            Some(parent_id) => traversal::find(roots, parent_id)
                .map_or(false, |parent| cx.registry.allows_child(parent.kind(), kind)),
        };
        if !legal {
            return Ok(skip(format!(
                "kind {} not allowed beside {}",
                kind, reference_id
            )));
        }

        let block = default_block(kind, cx.registry, cx.ids);
        let new_id = block.id.clone();
        let Some(list) = traversal::sibling_list_mut(roots, &location) else {
            return Ok(skip(format!("sibling list of {} unavailable", reference_id)));
        };
        let at = match position {
            InsertPosition::Before => location.index,
            InsertPosition::After => location.index + 1,
        };
        list.insert(at, block);
        Ok(Outcome::applied_select(new_id))
    }

    fn apply_insert_at_end(
        roots: &mut Vec<Block>,
        kind: &str,
        cx: &mut EditContext,
    ) -> Result<Outcome, MutationError> {
        let kind = cx.registry.resolve(kind)?;
        if !cx.registry.allowed_at_root(kind) {
            return Ok(skip(format!("kind {} not allowed at root level", kind)));
        }

        let block = default_block(kind, cx.registry, cx.ids);
        let new_id = block.id.clone();
        roots.push(block);
        Ok(Outcome::applied_select(new_id))
    }

    fn apply_insert_into_container(
        roots: &mut Vec<Block>,
        kind: &str,
        container_id: &str,
        slot_id: Option<&str>,
        cx: &mut EditContext,
    ) -> Result<Outcome, MutationError> {
        let kind = cx.registry.resolve(kind)?;

        let Some(container) = traversal::find(roots, container_id) else {
            return Ok(skip(format!("container not found: {}", container_id)));
        };
        let container_kind = container.kind();
        if !container.is_container() {
            return Ok(skip(format!(
                "{} ({}) is not a container",
                container_id, container_kind
            )));
        }
        if !cx.registry.allows_child(container_kind, kind) {
            return Ok(skip(format!(
                "kind {} not allowed inside {}",
                kind, container_kind
            )));
        }

        // Resolve the target pane before creating anything: explicit slot,
        // then the session's active slot, then the first tab. Each
        // candidate must be a current tab id.
        let target_slot = match container.slot_ids() {
            None => None,
            Some(slots) => {
                let resolved = [slot_id, cx.active_slot.as_deref(), slots.first().copied()]
                    .into_iter()
                    .flatten()
                    .find(|candidate| slots.contains(candidate));
                match resolved {
                    Some(slot) => Some(slot.to_string()),
                    None => {
                        return Ok(skip(format!(
                            "could not resolve a target pane in {}",
                            container_id
                        )))
                    }
                }
            }
        };

        let block = default_block(kind, cx.registry, cx.ids);
        let new_id = block.id.clone();
        let Some(container) = traversal::find_mut(roots, container_id) else {
            return Ok(skip(format!("container not found: {}", container_id)));
        };
        match target_slot {
            None => match container.children_mut() {
                Some(children) => children.push(block),
                None => {
                    return Ok(skip(format!(
                        "container {} lost its child list",
                        container_id
                    )))
                }
            },
            Some(slot) => match container.panes_mut() {
                Some(panes) => panes.entry(slot).or_default().push(block),
                None => {
                    return Ok(skip(format!("container {} lost its panes", container_id)))
                }
            },
        }
        Ok(Outcome::applied_select(new_id))
    }

    fn apply_add_item(roots: &mut Vec<Block>, node_id: &str, cx: &mut EditContext) -> Outcome {
        let Some(block) = traversal::find_mut(roots, node_id) else {
            return skip(format!("add-item target not found: {}", node_id));
        };
        let kind = block.kind();
        let capacity = cx.registry.item_capacity(&block.payload);

        let Some(items) = block.payload.items_mut() else {
            return skip(format!("{} ({}) holds no item list", node_id, kind));
        };
        if let Some(capacity) = capacity {
            if items.len() >= capacity {
                return skip(format!(
                    "item list of {} at capacity {}",
                    node_id, capacity
                ));
            }
        }

        let item = Item {
            id: cx.ids.new_id(),
            fields: cx.registry.default_item_fields(kind),
        };
        let item_id = item.id.clone();
        items.push(item);

        // A new tab header opens an empty pane for itself.
        if let Some(panes) = block.payload.panes_mut() {
            panes.entry(item_id.clone()).or_default();
        }

        Outcome::Applied {
            select: None,
            new_item_id: Some(item_id),
        }
    }

    fn apply_update_item(
        roots: &mut Vec<Block>,
        node_id: &str,
        item_id: &str,
        patch: &Value,
    ) -> Outcome {
        let Some(block) = traversal::find_mut(roots, node_id) else {
            return skip(format!("update-item owner not found: {}", node_id));
        };
        let Value::Object(patch) = patch else {
            return skip(format!("item patch for {} is not an object", item_id));
        };
        let Some(items) = block.payload.items_mut() else {
            return skip(format!("{} holds no item list", node_id));
        };
        let Some(item) = items.iter_mut().find(|item| item.id == item_id) else {
            return skip(format!("item {} not found on {}", item_id, node_id));
        };

        for (key, value) in patch {
            // item ids are immutable
            if key == "id" {
                continue;
            }
            if value.is_null() {
                item.fields.remove(key);
            } else {
                item.fields.insert(key.clone(), value.clone());
            }
        }
        Outcome::applied()
    }

    fn apply_remove_item(roots: &mut Vec<Block>, node_id: &str, item_id: &str) -> Outcome {
        let Some(block) = traversal::find_mut(roots, node_id) else {
            return skip(format!("remove-item owner not found: {}", node_id));
        };
        let Some(items) = block.payload.items_mut() else {
            return skip(format!("{} holds no item list", node_id));
        };
        let Some(position) = items.iter().position(|item| item.id == item_id) else {
            return skip(format!("item {} not found on {}", item_id, node_id));
        };

        items.remove(position);
        // Removing a tab header drops its pane, subtree included.
        block.payload.normalize();
        Outcome::applied()
    }

    fn apply_move_item(
        roots: &mut Vec<Block>,
        node_id: &str,
        index: usize,
        direction: Direction,
    ) -> Outcome {
        let Some(block) = traversal::find_mut(roots, node_id) else {
            return skip(format!("move-item owner not found: {}", node_id));
        };
        let Some(items) = block.payload.items_mut() else {
            return skip(format!("{} holds no item list", node_id));
        };
        if index >= items.len() {
            return skip(format!("item index {} out of range on {}", index, node_id));
        }

        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => {
                let next = index + 1;
                (next < items.len()).then_some(next)
            }
        };
        let Some(target) = target else {
            return skip(format!("item move out of bounds on {}", node_id));
        };

        items.swap(index, target);
        Outcome::applied()
    }

    fn apply_set_column_count(
        roots: &mut Vec<Block>,
        container_id: &str,
        change: CountChange,
        cx: &mut EditContext,
    ) -> Outcome {
        let Some(block) = traversal::find_mut(roots, container_id) else {
            return skip(format!("set-column-count target not found: {}", container_id));
        };
        if !matches!(block.payload, Payload::Columns { .. }) {
            return skip(format!(
                "set-column-count target {} is not a columns row",
                container_id
            ));
        }

        match change {
            CountChange::Increase => {
                let count = block.children().map_or(0, |children| children.len());
                if count >= MAX_COLUMNS {
                    return skip(format!(
                        "columns {} already at maximum {}",
                        container_id, MAX_COLUMNS
                    ));
                }
                let column = default_block(BlockKind::Column, cx.registry, cx.ids);
                if let Payload::Columns { children } = &mut block.payload {
                    children.push(column);
                }
            }
            CountChange::Decrease => {
                if let Payload::Columns { children } = &mut block.payload {
                    if children.len() <= MIN_COLUMNS {
                        return skip(format!(
                            "columns {} already at structural minimum {}",
                            container_id, MIN_COLUMNS
                        ));
                    }
                    children.pop();
                }
            }
        }
        Outcome::applied()
    }
}

/// Fresh ids for a duplicated subtree: the block, every descendant block,
/// and every item in every descendant's item lists. Tab panes are re-keyed
/// to the renamed tab items so the slot wiring survives the clone.
fn reassign_ids(block: &mut Block, ids: &mut IdGenerator) {
    block.id = ids.new_id();
    match &mut block.payload {
        Payload::Section { children }
        | Payload::Columns { children }
        | Payload::Column { children } => {
            for child in children {
                reassign_ids(child, ids);
            }
        }
        Payload::Tabs { tabs, panes } => {
            let mut renamed: HashMap<String, String> = HashMap::new();
            for tab in tabs.iter_mut() {
                let fresh = ids.new_id();
                let old = std::mem::replace(&mut tab.id, fresh.clone());
                renamed.insert(old, fresh);
            }
            let old_panes = std::mem::take(panes);
            for (old_id, mut pane) in old_panes {
                for child in &mut pane {
                    reassign_ids(child, ids);
                }
                let key = renamed.get(&old_id).cloned().unwrap_or(old_id);
                panes.insert(key, pane);
            }
        }
        Payload::Carousel { slides } => {
            for slide in slides {
                slide.id = ids.new_id();
            }
        }
        Payload::Navigation { links, .. } => {
            for link in links {
                link.id = ids.new_id();
            }
        }
        Payload::Footer { columns } => {
            for column in columns {
                column.id = ids.new_id();
            }
        }
        Payload::Grid { items, .. } => {
            for item in items {
                item.id = ids.new_id();
            }
        }
        Payload::Text { .. }
        | Payload::Hero { .. }
        | Payload::Image { .. }
        | Payload::Button { .. } => {}
    }
}
