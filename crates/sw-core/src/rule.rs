//! Serde model of declarativeNetRequest dynamic rules
//!
//! These types serialize to exactly the JSON the browser accepts in
//! `updateDynamicRules`, so the extension's background script can pass the
//! compiler output straight through.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// First rule id owned by this extension. Ids below this belong to other
/// features.
pub const FIRST_RULE_ID: u32 = 1000;

/// Size of the reserved id range. With [`FIRST_RULE_ID`] this reserves
/// 1000..=1099, so at most 100 rules are representable at once.
pub const MAX_RULES: usize = 100;

/// Extension-packaged page blocked navigations are redirected to.
pub const WARNING_PAGE_PATH: &str = "/warning/warning.html";

/// The full reserved id range, used as the removal set on every replace.
///
/// Removing the whole range unconditionally (rather than diffing) makes every
/// replace self-healing: stale rules left behind by a partial failure are
/// swept out on the next call.
pub fn reserved_rule_ids() -> Vec<u32> {
    (FIRST_RULE_ID..FIRST_RULE_ID + MAX_RULES as u32).collect()
}

/// One dynamic rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Rule {
    pub id: u32,
    pub priority: u32,
    pub action: RuleAction,
    pub condition: RuleCondition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RuleAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub redirect: Redirect,
}

impl RuleAction {
    /// The one action this extension installs: redirect to the warning page.
    pub fn redirect_to_warning() -> Self {
        Self {
            action_type: ActionType::Redirect,
            redirect: Redirect {
                extension_path: WARNING_PAGE_PATH.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ActionType {
    Redirect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Redirect {
    pub extension_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RuleCondition {
    pub url_filter: String,
    pub resource_types: Vec<ResourceType>,
}

/// Request types a condition applies to. Blocking is scoped to top-level
/// page loads; sub-resources and frames are never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ResourceType {
    MainFrame,
}

/// A complete `updateDynamicRules` payload: remove the whole reserved range,
/// then add the freshly compiled rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RuleUpdate {
    pub remove_rule_ids: Vec<u32>,
    pub add_rules: Vec<Rule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_range() {
        let ids = reserved_rule_ids();
        assert_eq!(ids.len(), MAX_RULES);
        assert_eq!(ids.first(), Some(&1000));
        assert_eq!(ids.last(), Some(&1099));
    }

    #[test]
    fn test_rule_serializes_to_dnr_json() {
        let rule = Rule {
            id: 1000,
            priority: 1,
            action: RuleAction::redirect_to_warning(),
            condition: RuleCondition {
                url_filter: "||example.com^".to_string(),
                resource_types: vec![ResourceType::MainFrame],
            },
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1000,
                "priority": 1,
                "action": {
                    "type": "redirect",
                    "redirect": { "extensionPath": "/warning/warning.html" }
                },
                "condition": {
                    "urlFilter": "||example.com^",
                    "resourceTypes": ["main_frame"]
                }
            })
        );
    }

    #[test]
    fn test_rule_round_trip() {
        let rule = Rule {
            id: 1042,
            priority: 1,
            action: RuleAction::redirect_to_warning(),
            condition: RuleCondition {
                url_filter: "||a.com^".to_string(),
                resource_types: vec![ResourceType::MainFrame],
            },
        };
        let json = serde_json::to_string(&rule).unwrap();
        let back: Rule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }
}
