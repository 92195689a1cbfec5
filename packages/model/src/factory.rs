//! Block construction with minimal valid defaults.
//!
//! Kinds with a structural minimum come pre-populated: `columns` starts
//! with its minimum column count, `tabs` with two tabs and their empty
//! panes.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::block::{Block, Item, Payload};
use crate::id::IdGenerator;
use crate::kind::{BlockKind, KindRegistry, ModelError, MIN_COLUMNS};

/// Construct a new block from a wire kind string.
///
/// Side-effect-free aside from id generation. An unrecognized kind is an
/// explicit error; insert operations abort before touching the tree.
pub fn create_block(
    kind: &str,
    registry: &KindRegistry,
    ids: &mut IdGenerator,
) -> Result<Block, ModelError> {
    let kind = registry.resolve(kind)?;
    Ok(default_block(kind, registry, ids))
}

/// Construct the default block for an already-resolved kind.
pub fn default_block(kind: BlockKind, registry: &KindRegistry, ids: &mut IdGenerator) -> Block {
    let payload = match kind {
        BlockKind::Section => Payload::Section { children: vec![] },
        BlockKind::Columns => Payload::Columns {
            children: (0..MIN_COLUMNS)
                .map(|_| default_block(BlockKind::Column, registry, ids))
                .collect(),
        },
        BlockKind::Column => Payload::Column { children: vec![] },
        BlockKind::Tabs => {
            let tabs: Vec<Item> = (1..=2)
                .map(|n| Item {
                    id: ids.new_id(),
                    fields: [(
                        "label".to_string(),
                        Value::String(format!("Tab {}", n)),
                    )]
                    .into_iter()
                    .collect(),
                })
                .collect();
            let panes: BTreeMap<String, Vec<Block>> = tabs
                .iter()
                .map(|tab| (tab.id.clone(), Vec::new()))
                .collect();
            Payload::Tabs { tabs, panes }
        }
        BlockKind::Text => Payload::Text {
            text: "New text".to_string(),
        },
        BlockKind::Hero => Payload::Hero {
            heading: "Hero heading".to_string(),
            subheading: None,
            cta_label: None,
            cta_url: None,
        },
        BlockKind::Image => Payload::Image {
            src: String::new(),
            alt: String::new(),
        },
        BlockKind::Button => Payload::Button {
            label: "Button".to_string(),
            url: "#".to_string(),
        },
        BlockKind::Carousel => Payload::Carousel { slides: vec![] },
        BlockKind::Navigation => Payload::Navigation {
            brand: None,
            links: vec![],
        },
        BlockKind::Footer => Payload::Footer { columns: vec![] },
        BlockKind::Grid => Payload::Grid {
            rows: 2,
            cols: 2,
            items: vec![],
        },
    };

    Block {
        id: ids.new_id(),
        payload,
        style: None,
        visibility: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_fails() {
        let registry = KindRegistry::with_builtin_kinds();
        let mut ids = IdGenerator::new("test");

        let err = create_block("widget", &registry, &mut ids).unwrap_err();
        assert_eq!(err, ModelError::UnknownKind("widget".to_string()));
    }

    #[test]
    fn test_columns_prepopulates_structural_minimum() {
        let registry = KindRegistry::with_builtin_kinds();
        let mut ids = IdGenerator::new("test");

        let columns = create_block("columns", &registry, &mut ids).unwrap();
        assert_eq!(columns.kind(), BlockKind::Columns);

        let children = columns.children().unwrap();
        assert_eq!(children.len(), MIN_COLUMNS);
        for child in children {
            assert_eq!(child.kind(), BlockKind::Column);
        }
    }

    #[test]
    fn test_tabs_prepopulates_panes() {
        let registry = KindRegistry::with_builtin_kinds();
        let mut ids = IdGenerator::new("test");

        let tabs = create_block("tabs", &registry, &mut ids).unwrap();
        let slot_ids = tabs.slot_ids().unwrap();
        assert_eq!(slot_ids.len(), 2);

        let panes = tabs.panes().unwrap();
        for slot in slot_ids {
            assert!(panes.get(slot).is_some_and(|pane| pane.is_empty()));
        }
    }

    #[test]
    fn test_fresh_ids_per_block() {
        let registry = KindRegistry::with_builtin_kinds();
        let mut ids = IdGenerator::new("test");

        let a = create_block("text", &registry, &mut ids).unwrap();
        let b = create_block("text", &registry, &mut ids).unwrap();
        assert_ne!(a.id, b.id);
    }
}
