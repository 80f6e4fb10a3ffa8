//! SiteWarden Core Library
//!
//! This crate provides the data model and rule compiler for the SiteWarden
//! site blocker. It maps a user-maintained list of blocked domains onto
//! declarativeNetRequest dynamic rules that redirect main-frame navigations
//! to a packaged warning page.
//!
//! # Architecture
//!
//! Compilation is a pure, order-preserving map: entry `i` of the input always
//! becomes rule id `1000 + i`, so compiling the same list twice yields the
//! same rules and replacing the whole reserved id range is idempotent.
//!
//! # Modules
//!
//! - `entry`: the persisted `UrlEntry` record and list helpers
//! - `rule`: serde model of a dynamic rule and the reserved id range
//! - `compiler`: domain list -> rule list compilation
//! - `urlfilter`: `||domain^` match semantics for tests and bindings

pub mod compiler;
pub mod entry;
pub mod rule;
pub mod urlfilter;

// Re-export commonly used items
pub use compiler::{compile_rules, compile_update, url_filter, CompileError};
pub use entry::{domains, normalize_host, NormalizeError, UrlEntry, STORAGE_KEY};
pub use rule::{
    reserved_rule_ids, ResourceType, Rule, RuleAction, RuleCondition, RuleUpdate, FIRST_RULE_ID,
    MAX_RULES, WARNING_PAGE_PATH,
};
pub use urlfilter::{extract_host, host_covered_by, matches_url};
