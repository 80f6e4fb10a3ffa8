//! Rule Synchronizer
//!
//! Replaces the sink's entire reserved id range with a freshly compiled rule
//! set in one call. Because the removal set is always the full range and the
//! added rules are recomputed from scratch, the operation is idempotent and
//! converges even after a partially failed predecessor.

use std::sync::Arc;

use sw_core::{compile_rules, domains, reserved_rule_ids, CompileError, UrlEntry, MAX_RULES};

use crate::sink::{InstallError, RuleSink};

pub struct RuleSynchronizer {
    sink: Arc<dyn RuleSink>,
}

impl RuleSynchronizer {
    pub fn new(sink: Arc<dyn RuleSink>) -> Self {
        Self { sink }
    }

    /// Install the rule set for `domains`, replacing whatever the sink
    /// currently holds in the reserved range.
    ///
    /// Over-capacity lists are truncated to the first [`MAX_RULES`] domains
    /// with a warning; the representable prefix stays protected. Sink errors
    /// are logged and returned, never retried: the platform call is atomic,
    /// so the previous rule set simply stays active.
    pub async fn synchronize(&self, domains: &[String]) -> Result<(), InstallError> {
        let rules = match compile_rules(domains) {
            Ok(rules) => rules,
            Err(err @ CompileError::CapacityExceeded { .. }) => {
                log::warn!("{err}; keeping the first {MAX_RULES} entries");
                compile_rules(&domains[..MAX_RULES])
                    .map_err(|err| InstallError::Rejected(err.to_string()))?
            }
        };

        if let Err(err) = self.sink.replace(&reserved_rule_ids(), rules).await {
            log::error!("dynamic rule replacement failed: {err}");
            return Err(err);
        }
        Ok(())
    }

    /// Convenience wrapper taking the raw entry list as read from the store.
    pub async fn synchronize_entries(&self, entries: &[UrlEntry]) -> Result<(), InstallError> {
        self.synchronize(&domains(entries)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::DynamicRuleTable;
    use sw_core::{Rule, RuleAction, RuleCondition, ResourceType};

    fn synchronizer() -> (Arc<DynamicRuleTable>, RuleSynchronizer) {
        let table = Arc::new(DynamicRuleTable::new());
        let sync = RuleSynchronizer::new(table.clone());
        (table, sync)
    }

    #[tokio::test]
    async fn test_synchronize_is_idempotent() {
        let (table, sync) = synchronizer();
        let domains = vec!["a.com".to_string(), "b.com".to_string()];

        sync.synchronize(&domains).await.unwrap();
        let after_first = table.active_rules().await;
        sync.synchronize(&domains).await.unwrap();
        assert_eq!(table.active_rules().await, after_first);
    }

    #[tokio::test]
    async fn test_stale_rules_in_reserved_range_are_swept() {
        let (table, sync) = synchronizer();

        // A stale rule a previous, partially failed run left behind.
        let stale = Rule {
            id: 1042,
            priority: 1,
            action: RuleAction::redirect_to_warning(),
            condition: RuleCondition {
                url_filter: "||stale.com^".to_string(),
                resource_types: vec![ResourceType::MainFrame],
            },
        };
        table.replace(&[], vec![stale]).await.unwrap();

        sync.synchronize(&["fresh.com".to_string()]).await.unwrap();
        let active = table.active_rules().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, 1000);
        assert_eq!(active[0].condition.url_filter, "||fresh.com^");
    }

    #[tokio::test]
    async fn test_rules_outside_reserved_range_untouched() {
        let (table, sync) = synchronizer();

        let foreign = Rule {
            id: 7,
            priority: 1,
            action: RuleAction::redirect_to_warning(),
            condition: RuleCondition {
                url_filter: "||other-feature.com^".to_string(),
                resource_types: vec![ResourceType::MainFrame],
            },
        };
        table.replace(&[], vec![foreign.clone()]).await.unwrap();

        sync.synchronize(&[]).await.unwrap();
        assert_eq!(table.active_rules().await, vec![foreign]);
    }

    #[tokio::test]
    async fn test_over_capacity_list_truncates_with_prefix_protected() {
        let (table, sync) = synchronizer();
        let domains: Vec<String> = (0..150).map(|i| format!("d{i}.com")).collect();

        sync.synchronize(&domains).await.unwrap();
        let active = table.active_rules().await;
        assert_eq!(active.len(), MAX_RULES);
        assert_eq!(active[0].condition.url_filter, "||d0.com^");
        assert_eq!(active[99].condition.url_filter, "||d99.com^");
    }

    #[tokio::test]
    async fn test_empty_list_clears_reserved_range() {
        let (table, sync) = synchronizer();
        sync.synchronize(&["a.com".to_string()]).await.unwrap();
        sync.synchronize(&[]).await.unwrap();
        assert!(table.active_rules().await.is_empty());
    }
}
