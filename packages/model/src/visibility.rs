use serde::{Deserialize, Serialize};

/// Declarative audience rules attached to a block.
///
/// Every field is optional; an absent field imposes no constraint. A block
/// with no rule-set at all is always visible. Boolean fields and the tier
/// require exact equality against the viewer context; the list fields
/// match when the context's single value is a member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_logged_in: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_subscribed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Vec<String>>,
}

impl VisibilityRules {
    /// True when no field constrains anything, same as carrying no
    /// rule-set at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_wire_format() {
        let rules = VisibilityRules {
            is_logged_in: Some(true),
            subscription_tier: Some("pro".to_string()),
            region: Some(vec!["US".to_string(), "IN".to_string()]),
            ..Default::default()
        };

        let json = serde_json::to_value(&rules).unwrap();
        assert_eq!(json["isLoggedIn"], true);
        assert_eq!(json["subscriptionTier"], "pro");
        assert_eq!(json["region"][1], "IN");
        assert!(json.get("isSubscribed").is_none());
    }

    #[test]
    fn test_empty_rules() {
        assert!(VisibilityRules::default().is_empty());
        assert!(!VisibilityRules {
            is_subscribed: Some(false),
            ..Default::default()
        }
        .is_empty());
    }
}
