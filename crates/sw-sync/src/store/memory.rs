//! Session-only in-memory backend
//!
//! Stand-in for extension-managed storage in dev mode and the fallback when
//! the persistent backend is unavailable. Contents vanish with the process.

use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

use sw_core::UrlEntry;

use super::{ChangeEvent, EntryStore, StoreError, Subscribers};

#[derive(Default)]
pub struct MemoryStore {
    // None until the first write, mirroring an absent storage key.
    entries: RwLock<Option<Vec<UrlEntry>>>,
    subscribers: Subscribers,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn read(&self) -> Result<Vec<UrlEntry>, StoreError> {
        Ok(self.entries.read().unwrap().clone().unwrap_or_default())
    }

    async fn write(&self, entries: Vec<UrlEntry>) -> Result<(), StoreError> {
        let old = {
            let mut guard = self.entries.write().unwrap();
            guard.replace(entries.clone())
        };
        self.subscribers.notify(old, Some(entries));
        Ok(())
    }

    fn subscribe(&self) -> UnboundedReceiver<ChangeEvent> {
        self.subscribers.add()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_before_any_write_is_empty() {
        let store = MemoryStore::new();
        assert!(store.read().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_preserves_order() {
        let store = MemoryStore::new();
        let entries = vec![
            UrlEntry::new("b", "b.com"),
            UrlEntry::new("a", "a.com"),
        ];
        store.write(entries.clone()).await.unwrap();
        assert_eq!(store.read().await.unwrap(), entries);
    }

    #[tokio::test]
    async fn test_change_events_carry_old_and_new_in_commit_order() {
        let store = MemoryStore::new();
        let mut events = store.subscribe();

        let first = vec![UrlEntry::new("a", "a.com")];
        let second = vec![UrlEntry::new("a", "a.com"), UrlEntry::new("b", "b.com")];
        store.write(first.clone()).await.unwrap();
        store.write(second.clone()).await.unwrap();

        let e1 = events.recv().await.unwrap();
        assert_eq!(e1.old, None);
        assert_eq!(e1.new, Some(first.clone()));

        let e2 = events.recv().await.unwrap();
        assert_eq!(e2.old, Some(first));
        assert_eq!(e2.new, Some(second));
    }
}
