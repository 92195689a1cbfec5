use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::kind::BlockKind;
use crate::visibility::VisibilityRules;

/// Free-form presentation attributes. Opaque to the core; the presentation
/// layer decides what the keys mean.
pub type StyleMap = Map<String, Value>;

/// One element of the editable page tree (a "block").
///
/// The id is unique within the whole tree and immutable after creation.
/// Duplication is the only operation that ever regenerates ids, and it
/// regenerates them for the entire duplicated subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(flatten)]
    pub payload: Payload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibilityRules>,
}

/// A small record inside a payload-level list: one carousel slide, one nav
/// link, one footer column, one grid cell, one tab header.
///
/// Item ids are unique within their owning list, not globally. The field
/// set is open; the core only interprets `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Kind-specific block data.
///
/// The `kind` tag doubles as the block's discriminant. Plain container
/// kinds embed one `children` list; `tabs` holds one pane per tab item,
/// keyed by that item's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Payload {
    /// Ordinary nesting container.
    Section {
        #[serde(default)]
        children: Vec<Block>,
    },

    /// Row of columns. Structurally bounded: never fewer than
    /// [`MIN_COLUMNS`](crate::kind::MIN_COLUMNS), never more than
    /// [`MAX_COLUMNS`](crate::kind::MAX_COLUMNS).
    Columns {
        #[serde(default)]
        children: Vec<Block>,
    },

    /// One column of a `columns` row.
    Column {
        #[serde(default)]
        children: Vec<Block>,
    },

    /// Multi-slot container: one independent child list per tab.
    Tabs {
        #[serde(default)]
        tabs: Vec<Item>,
        #[serde(default)]
        panes: BTreeMap<String, Vec<Block>>,
    },

    Text {
        text: String,
    },

    #[serde(rename_all = "camelCase")]
    Hero {
        heading: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subheading: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cta_label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cta_url: Option<String>,
    },

    Image {
        src: String,
        #[serde(default)]
        alt: String,
    },

    Button {
        label: String,
        url: String,
    },

    Carousel {
        #[serde(default)]
        slides: Vec<Item>,
    },

    Navigation {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        brand: Option<String>,
        #[serde(default)]
        links: Vec<Item>,
    },

    Footer {
        #[serde(default)]
        columns: Vec<Item>,
    },

    Grid {
        rows: u32,
        cols: u32,
        #[serde(default)]
        items: Vec<Item>,
    },
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        self.payload.kind()
    }

    /// Child list of a plain container. `None` for leaf kinds and for
    /// `tabs`, whose children live in named panes.
    pub fn children(&self) -> Option<&Vec<Block>> {
        self.payload.children()
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        self.payload.children_mut()
    }

    /// Named panes of a multi-slot container.
    pub fn panes(&self) -> Option<&BTreeMap<String, Vec<Block>>> {
        self.payload.panes()
    }

    pub fn panes_mut(&mut self) -> Option<&mut BTreeMap<String, Vec<Block>>> {
        self.payload.panes_mut()
    }

    /// Every child list this block owns, panes included. This is the one
    /// accessor traversal recurses through, so no operation needs to know
    /// which shapes exist.
    pub fn child_lists(&self) -> Vec<&Vec<Block>> {
        match &self.payload {
            Payload::Section { children }
            | Payload::Columns { children }
            | Payload::Column { children } => vec![children],
            Payload::Tabs { panes, .. } => panes.values().collect(),
            _ => Vec::new(),
        }
    }

    pub fn child_lists_mut(&mut self) -> Vec<&mut Vec<Block>> {
        match &mut self.payload {
            Payload::Section { children }
            | Payload::Columns { children }
            | Payload::Column { children } => vec![children],
            Payload::Tabs { panes, .. } => panes.values_mut().collect(),
            _ => Vec::new(),
        }
    }

    /// Slot ids of a multi-slot container, in tab order (not pane-map
    /// order).
    pub fn slot_ids(&self) -> Option<Vec<&str>> {
        match &self.payload {
            Payload::Tabs { tabs, .. } => Some(tabs.iter().map(|t| t.id.as_str()).collect()),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.children().is_some() || self.panes().is_some()
    }
}

impl Payload {
    pub fn kind(&self) -> BlockKind {
        match self {
            Payload::Section { .. } => BlockKind::Section,
            Payload::Columns { .. } => BlockKind::Columns,
            Payload::Column { .. } => BlockKind::Column,
            Payload::Tabs { .. } => BlockKind::Tabs,
            Payload::Text { .. } => BlockKind::Text,
            Payload::Hero { .. } => BlockKind::Hero,
            Payload::Image { .. } => BlockKind::Image,
            Payload::Button { .. } => BlockKind::Button,
            Payload::Carousel { .. } => BlockKind::Carousel,
            Payload::Navigation { .. } => BlockKind::Navigation,
            Payload::Footer { .. } => BlockKind::Footer,
            Payload::Grid { .. } => BlockKind::Grid,
        }
    }

    pub fn children(&self) -> Option<&Vec<Block>> {
        match self {
            Payload::Section { children }
            | Payload::Columns { children }
            | Payload::Column { children } => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Payload::Section { children }
            | Payload::Columns { children }
            | Payload::Column { children } => Some(children),
            _ => None,
        }
    }

    pub fn panes(&self) -> Option<&BTreeMap<String, Vec<Block>>> {
        match self {
            Payload::Tabs { panes, .. } => Some(panes),
            _ => None,
        }
    }

    pub fn panes_mut(&mut self) -> Option<&mut BTreeMap<String, Vec<Block>>> {
        match self {
            Payload::Tabs { panes, .. } => Some(panes),
            _ => None,
        }
    }

    /// The payload's embedded item list, for kinds that carry one. For
    /// `tabs` this is the tab header list.
    pub fn items(&self) -> Option<&Vec<Item>> {
        match self {
            Payload::Tabs { tabs, .. } => Some(tabs),
            Payload::Carousel { slides } => Some(slides),
            Payload::Navigation { links, .. } => Some(links),
            Payload::Footer { columns } => Some(columns),
            Payload::Grid { items, .. } => Some(items),
            _ => None,
        }
    }

    pub fn items_mut(&mut self) -> Option<&mut Vec<Item>> {
        match self {
            Payload::Tabs { tabs, .. } => Some(tabs),
            Payload::Carousel { slides } => Some(slides),
            Payload::Navigation { links, .. } => Some(links),
            Payload::Footer { columns } => Some(columns),
            Payload::Grid { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Re-establish structural invariants after a payload merge.
    ///
    /// - `grid`: trailing items past `rows * cols` are dropped without
    ///   confirmation when the capacity shrinks (destructive by design).
    /// - `tabs`: panes whose tab item no longer exists are dropped,
    ///   subtree included.
    pub fn normalize(&mut self) {
        match self {
            Payload::Grid { rows, cols, items } => {
                let capacity = (*rows as usize) * (*cols as usize);
                if items.len() > capacity {
                    items.truncate(capacity);
                }
            }
            Payload::Tabs { tabs, panes } => {
                let live: HashSet<&str> = tabs.iter().map(|t| t.id.as_str()).collect();
                panes.retain(|pane_id, _| live.contains(pane_id.as_str()));
            }
            _ => {}
        }
    }
}
