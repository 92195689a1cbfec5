//! # Pagecraft Evaluator
//!
//! Audience-visibility evaluation, consulted by renderers per block.
//!
//! The editor never calls this; rendering decides block by block whether
//! to draw, against the concrete viewer state it was handed.

pub mod visibility;

pub use visibility::{evaluate, is_visible, visible_roots, ViewerContext};
