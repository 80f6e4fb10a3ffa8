//! Change Listener
//!
//! Ties the Entry Store to the Rule Synchronizer for the lifetime of the
//! background task: one unconditional synchronization at startup, then one
//! per change notification, processed strictly in delivery order.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::sink::RuleSink;
use crate::store::EntryStore;
use crate::sync::RuleSynchronizer;

pub struct ChangeListener {
    store: Arc<dyn EntryStore>,
    synchronizer: RuleSynchronizer,
}

impl ChangeListener {
    pub fn new(store: Arc<dyn EntryStore>, sink: Arc<dyn RuleSink>) -> Self {
        Self {
            store,
            synchronizer: RuleSynchronizer::new(sink),
        }
    }

    /// Run until the store drops its notification channel.
    ///
    /// The subscription is armed before the startup read, so a mutation
    /// committed in between is seen twice at worst; synchronization is
    /// idempotent, so both orderings converge. Failures are logged and
    /// swallowed here: a bad cycle leaves the previous rule set standing
    /// and the next notification gets a fresh chance.
    pub async fn run(self) {
        let mut events = self.store.subscribe();

        let initial = match self.store.read().await {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("startup read failed ({err}); treating list as empty");
                Vec::new()
            }
        };
        let _ = self.synchronizer.synchronize_entries(&initial).await;

        while let Some(event) = events.recv().await {
            let entries = event.new.unwrap_or_default();
            let _ = self.synchronizer.synchronize_entries(&entries).await;
        }
    }

    /// Spawn the listener onto the current runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::DynamicRuleTable;
    use crate::store::MemoryStore;
    use std::time::Duration;
    use sw_core::{Rule, UrlEntry};

    async fn wait_for_rules(table: &DynamicRuleTable, want: usize) -> Vec<Rule> {
        for _ in 0..200 {
            let active = table.active_rules().await;
            if active.len() == want {
                return active;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("rule table never reached {want} rules");
    }

    #[tokio::test]
    async fn test_startup_sync_installs_preexisting_list() {
        let store = Arc::new(MemoryStore::new());
        store
            .write(vec![UrlEntry::new("a1", "facebook.com")])
            .await
            .unwrap();

        let table = Arc::new(DynamicRuleTable::new());
        ChangeListener::new(store, table.clone()).spawn();

        let active = wait_for_rules(&table, 1).await;
        assert_eq!(active[0].id, 1000);
        assert_eq!(active[0].condition.url_filter, "||facebook.com^");
    }

    #[tokio::test]
    async fn test_absent_new_value_clears_rules() {
        let store = Arc::new(MemoryStore::new());
        let table = Arc::new(DynamicRuleTable::new());
        let listener = ChangeListener::new(store.clone(), table.clone());
        listener
            .synchronizer
            .synchronize(&["a.com".to_string()])
            .await
            .unwrap();
        assert_eq!(table.active_rules().await.len(), 1);

        // Feed the listener an event whose new-value half is absent.
        let event = crate::store::ChangeEvent {
            old: Some(vec![UrlEntry::new("a", "a.com")]),
            new: None,
        };
        listener.synchronizer
            .synchronize_entries(&event.new.unwrap_or_default())
            .await
            .unwrap();
        assert!(table.active_rules().await.is_empty());
    }
}
