//! SiteWarden Synchronization Engine
//!
//! Keeps the browser's dynamic rule set consistent with the persisted
//! blocked-entries list. The moving parts:
//!
//! - `store`: the [`EntryStore`] trait with an ephemeral in-memory backend
//!   and a persistent JSON-file backend, plus change notifications
//! - `sink`: the [`RuleSink`] trait modeling the platform rule table, with
//!   an in-memory [`DynamicRuleTable`] used by tests and the CLI
//! - `sync`: the [`RuleSynchronizer`], one full replace per invocation
//! - `listener`: the [`ChangeListener`] loop tying store changes to the
//!   synchronizer, including the one-shot startup synchronization
//!
//! Every synchronization recomputes the complete desired rule set from the
//! latest store snapshot and removes the whole reserved id range before
//! adding, so repeated calls converge regardless of what a previous call
//! left behind.

pub mod listener;
pub mod sink;
pub mod store;
pub mod sync;

pub use listener::ChangeListener;
pub use sink::{DynamicRuleTable, InstallError, RuleSink};
pub use store::{open_store, ChangeEvent, EntryStore, JsonFileStore, MemoryStore, StoreError};
pub use sync::RuleSynchronizer;
