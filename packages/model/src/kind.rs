use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::block::Payload;

/// Structural minimum for the row-of-columns container. A `columns` block
/// is never mutated below this count.
pub const MIN_COLUMNS: usize = 2;

/// Structural maximum for the row-of-columns container.
pub const MAX_COLUMNS: usize = 6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Unknown block kind: {0}")]
    UnknownKind(String),
}

/// Discriminant of a [`Payload`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Section,
    Columns,
    Column,
    Tabs,
    Text,
    Hero,
    Image,
    Button,
    Carousel,
    Navigation,
    Footer,
    Grid,
}

impl BlockKind {
    pub const ALL: &'static [BlockKind] = &[
        BlockKind::Section,
        BlockKind::Columns,
        BlockKind::Column,
        BlockKind::Tabs,
        BlockKind::Text,
        BlockKind::Hero,
        BlockKind::Image,
        BlockKind::Button,
        BlockKind::Carousel,
        BlockKind::Navigation,
        BlockKind::Footer,
        BlockKind::Grid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Section => "section",
            BlockKind::Columns => "columns",
            BlockKind::Column => "column",
            BlockKind::Tabs => "tabs",
            BlockKind::Text => "text",
            BlockKind::Hero => "hero",
            BlockKind::Image => "image",
            BlockKind::Button => "button",
            BlockKind::Carousel => "carousel",
            BlockKind::Navigation => "navigation",
            BlockKind::Footer => "footer",
            BlockKind::Grid => "grid",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::UnknownKind(s.to_string()))
    }
}

/// Per-kind structural metadata.
#[derive(Debug, Clone)]
pub struct KindSpec {
    pub kind: BlockKind,
    /// Hard cap on the payload item list, when the kind carries one.
    /// `grid` computes its cap from `rows * cols` instead.
    pub item_cap: Option<usize>,
    /// Whether the kind may sit directly in the root block list.
    pub root: bool,
}

/// Registry of block kinds consulted by the factory and by insert
/// validation.
///
/// The builtin table covers every [`Payload`] variant; the presentation
/// layer's per-kind modules own everything else about a kind.
#[derive(Debug, Clone)]
pub struct KindRegistry {
    specs: HashMap<BlockKind, KindSpec>,
}

impl KindRegistry {
    pub fn with_builtin_kinds() -> Self {
        let mut specs = HashMap::new();
        for &kind in BlockKind::ALL {
            let item_cap = match kind {
                BlockKind::Tabs => Some(6),
                BlockKind::Carousel => Some(12),
                BlockKind::Navigation => Some(8),
                BlockKind::Footer => Some(4),
                _ => None,
            };
            specs.insert(
                kind,
                KindSpec {
                    kind,
                    item_cap,
                    root: kind != BlockKind::Column,
                },
            );
        }
        Self { specs }
    }

    pub fn spec(&self, kind: BlockKind) -> Option<&KindSpec> {
        self.specs.get(&kind)
    }

    /// Parse a wire kind string against the registered kinds.
    pub fn resolve(&self, kind: &str) -> Result<BlockKind, ModelError> {
        let kind: BlockKind = kind.parse()?;
        self.specs
            .get(&kind)
            .map(|spec| spec.kind)
            .ok_or_else(|| ModelError::UnknownKind(kind.to_string()))
    }

    pub fn allowed_at_root(&self, kind: BlockKind) -> bool {
        self.specs.get(&kind).map(|s| s.root).unwrap_or(false)
    }

    /// Nesting legality for insert operations.
    ///
    /// `columns` holds only `column`; `column` never holds another
    /// `column`, `columns`, or `section` (a column acts as a section but
    /// may not re-nest section-level structure).
    pub fn allows_child(&self, parent: BlockKind, child: BlockKind) -> bool {
        match parent {
            BlockKind::Columns => child == BlockKind::Column,
            BlockKind::Column => !matches!(
                child,
                BlockKind::Column | BlockKind::Columns | BlockKind::Section
            ),
            BlockKind::Section | BlockKind::Tabs => child != BlockKind::Column,
            _ => false,
        }
    }

    /// Effective cap on `payload`'s item list, `None` when unbounded or
    /// when the kind holds no items.
    pub fn item_capacity(&self, payload: &Payload) -> Option<usize> {
        match payload {
            Payload::Grid { rows, cols, .. } => Some((*rows as usize) * (*cols as usize)),
            _ => self.specs.get(&payload.kind()).and_then(|s| s.item_cap),
        }
    }

    /// Default field set for a freshly added item of `kind`.
    pub fn default_item_fields(&self, kind: BlockKind) -> Map<String, Value> {
        let mut fields = Map::new();
        match kind {
            BlockKind::Tabs => {
                fields.insert("label".to_string(), Value::from("New tab"));
            }
            BlockKind::Carousel => {
                fields.insert("title".to_string(), Value::from("New slide"));
                fields.insert("image".to_string(), Value::from(""));
            }
            BlockKind::Navigation => {
                fields.insert("label".to_string(), Value::from("New link"));
                fields.insert("url".to_string(), Value::from("#"));
            }
            BlockKind::Footer => {
                fields.insert("title".to_string(), Value::from("New column"));
            }
            BlockKind::Grid => {
                fields.insert("title".to_string(), Value::from("New cell"));
            }
            _ => {}
        }
        fields
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::with_builtin_kinds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_strings() {
        for &kind in BlockKind::ALL {
            assert_eq!(kind.as_str().parse::<BlockKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_an_error() {
        let err = "sparkle".parse::<BlockKind>().unwrap_err();
        assert_eq!(err, ModelError::UnknownKind("sparkle".to_string()));

        let registry = KindRegistry::with_builtin_kinds();
        assert!(registry.resolve("sparkle").is_err());
        assert_eq!(registry.resolve("hero").unwrap(), BlockKind::Hero);
    }

    #[test]
    fn test_nesting_rules() {
        let registry = KindRegistry::with_builtin_kinds();

        assert!(registry.allows_child(BlockKind::Columns, BlockKind::Column));
        assert!(!registry.allows_child(BlockKind::Columns, BlockKind::Text));
        assert!(!registry.allows_child(BlockKind::Column, BlockKind::Section));
        assert!(!registry.allows_child(BlockKind::Column, BlockKind::Columns));
        assert!(registry.allows_child(BlockKind::Column, BlockKind::Text));
        assert!(registry.allows_child(BlockKind::Section, BlockKind::Tabs));
        assert!(!registry.allows_child(BlockKind::Text, BlockKind::Text));

        assert!(!registry.allowed_at_root(BlockKind::Column));
        assert!(registry.allowed_at_root(BlockKind::Hero));
    }

    #[test]
    fn test_grid_capacity_follows_dimensions() {
        let registry = KindRegistry::with_builtin_kinds();
        let grid = Payload::Grid {
            rows: 3,
            cols: 4,
            items: vec![],
        };
        assert_eq!(registry.item_capacity(&grid), Some(12));

        let nav = Payload::Navigation {
            brand: None,
            links: vec![],
        };
        assert_eq!(registry.item_capacity(&nav), Some(8));

        let text = Payload::Text {
            text: String::new(),
        };
        assert_eq!(registry.item_capacity(&text), None);
    }
}
