//! Persistent JSON-file backend
//!
//! Persists the entry list as a JSON document with the single well-known
//! `blockedUrls` key, matching the layout extension-managed storage uses.
//! Last write wins; there is no cross-process locking.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;

use sw_core::UrlEntry;

use super::{ChangeEvent, EntryStore, StoreError, Subscribers};

/// Serialized document shape: `{"blockedUrls": [ ... ]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredDocument {
    #[serde(default, rename = "blockedUrls")]
    blocked_urls: Vec<UrlEntry>,
}

pub struct JsonFileStore {
    path: PathBuf,
    subscribers: Subscribers,
}

impl JsonFileStore {
    /// Open (or prepare to create) the store at `path`.
    ///
    /// Fails with [`StoreError::Unavailable`] when the containing directory
    /// cannot be created, and with a parse error when an existing file does
    /// not hold a valid entry document; `open_store` turns either into the
    /// in-memory fallback.
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|err| StoreError::Unavailable(err.to_string()))?;
            }
        }
        let store = Self {
            path,
            subscribers: Subscribers::new(),
        };
        // Reject a corrupt pre-existing file up front rather than on first use.
        store.read_document().await?;
        Ok(store)
    }

    /// Read the persisted document; `None` when the file does not exist yet.
    async fn read_document(&self) -> Result<Option<Vec<UrlEntry>>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if bytes.is_empty() {
            return Ok(None);
        }
        let doc: StoredDocument = serde_json::from_slice(&bytes)?;
        Ok(Some(doc.blocked_urls))
    }
}

#[async_trait]
impl EntryStore for JsonFileStore {
    async fn read(&self) -> Result<Vec<UrlEntry>, StoreError> {
        Ok(self.read_document().await?.unwrap_or_default())
    }

    async fn write(&self, entries: Vec<UrlEntry>) -> Result<(), StoreError> {
        let old = self.read_document().await?;
        let doc = StoredDocument {
            blocked_urls: entries.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&doc)?;
        tokio::fs::write(&self.path, bytes).await?;
        self.subscribers.notify(old, Some(entries));
        Ok(())
    }

    fn subscribe(&self) -> UnboundedReceiver<ChangeEvent> {
        self.subscribers.add()
    }
}
