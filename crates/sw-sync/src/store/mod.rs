//! Entry Store abstraction
//!
//! One trait, two interchangeable backends: [`MemoryStore`] keeps the list
//! for the lifetime of the process (the dev-mode / storage-unavailable
//! substitute), [`JsonFileStore`] persists it as a JSON document keyed by
//! `blockedUrls`. Backend selection happens once in [`open_store`]; call
//! sites never branch on the backend.

pub mod file;
pub mod memory;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use sw_core::UrlEntry;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed entry list: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One committed mutation of the blocked-entries key.
///
/// `None` means the key held no value on that side of the mutation;
/// consumers treat it as an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub old: Option<Vec<UrlEntry>>,
    pub new: Option<Vec<UrlEntry>>,
}

/// Persisted, ordered list of blocked-URL entries.
///
/// `read` resolves with an empty list when nothing is persisted. `write`
/// replaces the whole list (last write wins) and notifies every subscriber
/// afterwards, in commit order. Notifications are at-least-once per actual
/// mutation and only ever concern the blocked-entries key.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn read(&self) -> Result<Vec<UrlEntry>, StoreError>;
    async fn write(&self, entries: Vec<UrlEntry>) -> Result<(), StoreError>;
    fn subscribe(&self) -> UnboundedReceiver<ChangeEvent>;
}

/// Open the persistent backend at `path`, falling back to the session-only
/// in-memory backend when it cannot be reached. The fallback is silent
/// beyond a log line: the UI keeps working, but entries written in this
/// mode do not survive a restart.
pub async fn open_store(path: Option<PathBuf>) -> Arc<dyn EntryStore> {
    match path {
        Some(path) => match JsonFileStore::open(path).await {
            Ok(store) => Arc::new(store),
            Err(err) => {
                log::warn!("persistent store unavailable ({err}); using session-only storage");
                Arc::new(MemoryStore::new())
            }
        },
        None => Arc::new(MemoryStore::new()),
    }
}

/// Change-notification fan-out shared by both backends. Senders whose
/// receiver side has been dropped are pruned on the next notify.
#[derive(Default)]
pub(crate) struct Subscribers {
    senders: Mutex<Vec<UnboundedSender<ChangeEvent>>>,
}

impl Subscribers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&self) -> UnboundedReceiver<ChangeEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().unwrap().push(tx);
        rx
    }

    pub(crate) fn notify(&self, old: Option<Vec<UrlEntry>>, new: Option<Vec<UrlEntry>>) {
        let event = ChangeEvent { old, new };
        self.senders
            .lock()
            .unwrap()
            .retain(|sender| sender.send(event.clone()).is_ok());
    }
}
