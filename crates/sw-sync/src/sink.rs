//! Rule installation interface
//!
//! [`RuleSink`] models the platform's dynamic rule table: one atomic
//! remove-then-add replace call, scoped to the whole extension. The real
//! extension implements it over `updateDynamicRules`; [`DynamicRuleTable`]
//! is the in-process stand-in used by tests and the CLI.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use sw_core::Rule;

/// Error type for rule installation.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("rule installation rejected: {0}")]
    Rejected(String),
}

/// The extension-global dynamic rule table.
#[async_trait]
pub trait RuleSink: Send + Sync {
    /// Atomically remove `remove_ids` and add `add_rules`. All-or-nothing:
    /// on error the table is left exactly as it was.
    async fn replace(&self, remove_ids: &[u32], add_rules: Vec<Rule>) -> Result<(), InstallError>;

    /// Snapshot of the currently installed rules, ordered by id
    /// (`getDynamicRules` parity).
    async fn active_rules(&self) -> Vec<Rule>;
}

/// In-memory rule table with the platform's validation behavior: zero ids
/// and duplicate ids are rejected before anything is applied.
#[derive(Default)]
pub struct DynamicRuleTable {
    rules: Mutex<BTreeMap<u32, Rule>>,
}

impl DynamicRuleTable {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RuleSink for DynamicRuleTable {
    async fn replace(&self, remove_ids: &[u32], add_rules: Vec<Rule>) -> Result<(), InstallError> {
        let mut rules = self.rules.lock().unwrap();

        // Validate everything before touching the table.
        let mut seen = HashSet::new();
        for rule in &add_rules {
            if rule.id == 0 {
                return Err(InstallError::Rejected("rule id must be positive".into()));
            }
            if !seen.insert(rule.id) {
                return Err(InstallError::Rejected(format!(
                    "duplicate rule id {} in add set",
                    rule.id
                )));
            }
            if rules.contains_key(&rule.id) && !remove_ids.contains(&rule.id) {
                return Err(InstallError::Rejected(format!(
                    "rule id {} already installed",
                    rule.id
                )));
            }
        }

        for id in remove_ids {
            rules.remove(id);
        }
        for rule in add_rules {
            rules.insert(rule.id, rule);
        }
        Ok(())
    }

    async fn active_rules(&self) -> Vec<Rule> {
        self.rules.lock().unwrap().values().cloned().collect()
    }
}
