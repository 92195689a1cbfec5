//! Visibility rule evaluation.
//!
//! A block renders iff every rule field it declares matches the viewer
//! context. Absent fields impose no constraint; a block with no rule-set
//! at all is always visible.

use pagecraft_model::{Block, VisibilityRules};
use serde::{Deserialize, Serialize};

/// Concrete runtime state of the current viewer.
///
/// Unlike [`VisibilityRules`], every field here is a single value: the
/// viewer is in exactly one region on exactly one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerContext {
    pub is_logged_in: bool,
    pub is_subscribed: bool,
    /// `None` for viewers without a subscription tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_tier: Option<String>,
    pub region: String,
    pub platform: String,
}

/// Decide whether a block carrying `rules` renders for `context`.
///
/// Boolean fields and the tier require exact equality; the list fields
/// match when the context's single value is a member.
pub fn evaluate(rules: Option<&VisibilityRules>, context: &ViewerContext) -> bool {
    let Some(rules) = rules else {
        return true;
    };

    if let Some(required) = rules.is_logged_in {
        if context.is_logged_in != required {
            return false;
        }
    }
    if let Some(required) = rules.is_subscribed {
        if context.is_subscribed != required {
            return false;
        }
    }
    if let Some(tier) = &rules.subscription_tier {
        if context.subscription_tier.as_deref() != Some(tier.as_str()) {
            return false;
        }
    }
    if let Some(regions) = &rules.region {
        if !regions.iter().any(|region| *region == context.region) {
            return false;
        }
    }
    if let Some(platforms) = &rules.platform {
        if !platforms.iter().any(|platform| *platform == context.platform) {
            return false;
        }
    }
    true
}

/// Per-block convenience over [`evaluate`].
pub fn is_visible(block: &Block, context: &ViewerContext) -> bool {
    evaluate(block.visibility.as_ref(), context)
}

/// Root blocks that render for `context`, for renderers walking a page.
pub fn visible_roots<'t>(roots: &'t [Block], context: &ViewerContext) -> Vec<&'t Block> {
    roots
        .iter()
        .filter(|block| is_visible(block, context))
        .collect()
}
