//! # Tree traversal
//!
//! One recursive walk over the heterogeneous block forest, reused by every
//! mutation instead of reimplemented per operation. A block's children may
//! live directly on it (`children`) or be partitioned across named panes
//! (`tabs`); the walk recurses through [`Block::child_lists`] so no caller
//! needs to know which shapes exist.
//!
//! Absence is normal control flow: every lookup returns `Option`, never an
//! error, so callers can treat not-found as a branch (e.g. clearing
//! selection). Nothing here caches anything tied to a particular tree's
//! identity; the same functions work against any structural clone.

use pagecraft_model::Block;

/// Position of a node within its parent's concrete child list.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Id of the immediate parent block, `None` for top-level nodes.
    pub parent_id: Option<String>,
    /// Pane id when the parent is a multi-slot container.
    pub slot_id: Option<String>,
    /// Index within the sibling list.
    pub index: usize,
}

/// Find a block anywhere in the forest.
pub fn find<'t>(roots: &'t [Block], id: &str) -> Option<&'t Block> {
    for block in roots {
        if block.id == id {
            return Some(block);
        }
        for list in block.child_lists() {
            if let Some(found) = find(list, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Find a block anywhere in the forest, mutably.
pub fn find_mut<'t>(roots: &'t mut [Block], id: &str) -> Option<&'t mut Block> {
    for block in roots {
        if block.id == id {
            return Some(block);
        }
        for list in block.child_lists_mut() {
            if let Some(found) = find_mut(list, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Position lookup: parent, pane, and index for a node id.
pub fn locate(roots: &[Block], id: &str) -> Option<Location> {
    if let Some(index) = roots.iter().position(|block| block.id == id) {
        return Some(Location {
            parent_id: None,
            slot_id: None,
            index,
        });
    }
    locate_below(roots, id)
}

fn locate_below(list: &[Block], id: &str) -> Option<Location> {
    for block in list {
        if let Some(children) = block.children() {
            if let Some(index) = children.iter().position(|child| child.id == id) {
                return Some(Location {
                    parent_id: Some(block.id.clone()),
                    slot_id: None,
                    index,
                });
            }
            if let Some(location) = locate_below(children, id) {
                return Some(location);
            }
        }
        if let Some(panes) = block.panes() {
            for (slot_id, pane) in panes {
                if let Some(index) = pane.iter().position(|child| child.id == id) {
                    return Some(Location {
                        parent_id: Some(block.id.clone()),
                        slot_id: Some(slot_id.clone()),
                        index,
                    });
                }
                if let Some(location) = locate_below(pane, id) {
                    return Some(location);
                }
            }
        }
    }
    None
}

/// Resolve the concrete live sibling list a [`Location`] refers to, so the
/// caller can splice it. The root list itself for top-level locations.
pub fn sibling_list_mut<'t>(
    roots: &'t mut Vec<Block>,
    location: &Location,
) -> Option<&'t mut Vec<Block>> {
    match &location.parent_id {
        None => Some(roots),
        Some(parent_id) => {
            let parent = find_mut(roots, parent_id)?;
            match &location.slot_id {
                None => parent.children_mut(),
                Some(slot_id) => parent.panes_mut()?.get_mut(slot_id),
            }
        }
    }
}

/// Every node id and item id in the forest, in walk order. Duplicates are
/// preserved so callers can assert uniqueness.
pub fn collect_ids(roots: &[Block]) -> Vec<String> {
    let mut ids = Vec::new();
    collect_into(roots, &mut ids);
    ids
}

fn collect_into(list: &[Block], ids: &mut Vec<String>) {
    for block in list {
        ids.push(block.id.clone());
        if let Some(items) = block.payload.items() {
            for item in items {
                ids.push(item.id.clone());
            }
        }
        for child_list in block.child_lists() {
            collect_into(child_list, ids);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_model::{create_block, IdGenerator, KindRegistry};

    fn fixture() -> (Vec<Block>, KindRegistry, IdGenerator) {
        let registry = KindRegistry::with_builtin_kinds();
        let mut ids = IdGenerator::new("traversal-test");

        let mut section = create_block("section", &registry, &mut ids).unwrap();
        let text = create_block("text", &registry, &mut ids).unwrap();
        section.children_mut().unwrap().push(text);

        let mut tabs = create_block("tabs", &registry, &mut ids).unwrap();
        let deep = create_block("hero", &registry, &mut ids).unwrap();
        let first_slot = tabs.slot_ids().unwrap()[0].to_string();
        tabs.panes_mut().unwrap().get_mut(&first_slot).unwrap().push(deep);

        (vec![section, tabs], registry, ids)
    }

    #[test]
    fn test_find_at_root_and_nested() {
        let (roots, _, _) = fixture();
        let section_id = roots[0].id.clone();
        let text_id = roots[0].children().unwrap()[0].id.clone();

        assert_eq!(find(&roots, &section_id).unwrap().id, section_id);
        assert_eq!(find(&roots, &text_id).unwrap().id, text_id);
        assert!(find(&roots, "nope").is_none());
    }

    #[test]
    fn test_find_inside_tab_pane() {
        let (roots, _, _) = fixture();
        let tabs = &roots[1];
        let slot = tabs.slot_ids().unwrap()[0].to_string();
        let hero_id = tabs.panes().unwrap()[&slot][0].id.clone();

        assert!(find(&roots, &hero_id).is_some());

        let location = locate(&roots, &hero_id).unwrap();
        assert_eq!(location.parent_id.as_deref(), Some(tabs.id.as_str()));
        assert_eq!(location.slot_id.as_deref(), Some(slot.as_str()));
        assert_eq!(location.index, 0);
    }

    #[test]
    fn test_locate_root_level() {
        let (roots, _, _) = fixture();
        let location = locate(&roots, &roots[1].id).unwrap();
        assert_eq!(location.parent_id, None);
        assert_eq!(location.slot_id, None);
        assert_eq!(location.index, 1);

        assert!(locate(&roots, "missing").is_none());
    }

    #[test]
    fn test_sibling_list_mut_resolves_live_list() {
        let (mut roots, registry, mut ids) = fixture();
        let text_id = roots[0].children().unwrap()[0].id.clone();

        let location = locate(&roots, &text_id).unwrap();
        let list = sibling_list_mut(&mut roots, &location).unwrap();
        let button = create_block("button", &registry, &mut ids).unwrap();
        list.push(button);

        assert_eq!(roots[0].children().unwrap().len(), 2);
    }

    #[test]
    fn test_collect_ids_is_unique_for_factory_trees() {
        let (roots, _, _) = fixture();
        let ids = collect_ids(&roots);
        let unique: std::collections::HashSet<&String> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn test_traversal_works_on_clones() {
        let (roots, _, _) = fixture();
        let clone = roots.clone();
        let text_id = roots[0].children().unwrap()[0].id.clone();

        // Same answers against a structural clone; nothing is tied to the
        // original tree's identity.
        assert_eq!(
            locate(&roots, &text_id),
            locate(&clone, &text_id)
        );
    }
}
