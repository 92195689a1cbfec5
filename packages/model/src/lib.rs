//! # Pagecraft Model
//!
//! The block tree data model for the Pagecraft page builder.
//!
//! A page is an ordered forest of [`Block`]s. Each block carries a
//! kind-specific [`Payload`] (the `kind` tag is the discriminant the whole
//! editor dispatches on), an opaque style map, and optional audience
//! [`VisibilityRules`]. Container kinds embed their child lists directly in
//! the payload; the `tabs` kind holds one child list per tab, keyed by tab
//! item id.
//!
//! The [`KindRegistry`] is the single source of structural truth about a
//! kind: default payload, item caps, nesting legality. The presentation
//! layer owns everything else about a kind (rendering, editing forms).

pub mod block;
pub mod factory;
pub mod id;
pub mod kind;
pub mod visibility;

pub use block::{Block, Item, Payload, StyleMap};
pub use factory::{create_block, default_block};
pub use id::IdGenerator;
pub use kind::{BlockKind, KindRegistry, KindSpec, ModelError, MAX_COLUMNS, MIN_COLUMNS};
pub use visibility::VisibilityRules;
