//! Persisted blocked-URL entries
//!
//! These records are what the extension stores under the `blockedUrls` key
//! and what the list-editing UI produces. The core only ever reads them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Storage key holding the ordered entry list.
pub const STORAGE_KEY: &str = "blockedUrls";

/// One blocked-URL entry as persisted by the extension.
///
/// `id` is an opaque string, unique within the list. `url` is a bare
/// hostname: no scheme, no leading `www.`, no path. Normalization is the
/// producer's job (UI/CLI), not this crate's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UrlEntry {
    pub id: String,
    pub url: String,
}

impl UrlEntry {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

/// Project the entry list down to the domain strings the compiler consumes.
/// Order is preserved.
pub fn domains(entries: &[UrlEntry]) -> Vec<String> {
    entries.iter().map(|entry| entry.url.clone()).collect()
}

/// Error type for hostname normalization.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("empty URL")]
    Empty,
    #[error("invalid URL '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("no hostname in '{0}'")]
    NoHost(String),
}

/// Reduce user input to the bare hostname [`UrlEntry::url`] expects: no
/// scheme, no path, no leading `www.`, lowercase. Used by every producer
/// (CLI, extension UI via the wasm binding) so entries always arrive
/// pre-normalized.
pub fn normalize_host(input: &str) -> Result<String, NormalizeError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(NormalizeError::Empty);
    }
    let candidate = if text.contains("://") {
        text.to_string()
    } else {
        format!("https://{text}")
    };
    let parsed = url::Url::parse(&candidate).map_err(|source| NormalizeError::Invalid {
        input: text.to_string(),
        source,
    })?;
    let host = parsed
        .host_str()
        .ok_or_else(|| NormalizeError::NoHost(text.to_string()))?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    Ok(host.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_json_shape() {
        let entry = UrlEntry::new("a1", "facebook.com");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "a1", "url": "facebook.com"})
        );
    }

    #[test]
    fn test_entry_round_trip() {
        let entry = UrlEntry::new("x9", "example.org");
        let json = serde_json::to_string(&entry).unwrap();
        let back: UrlEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_domains_preserves_order() {
        let entries = vec![
            UrlEntry::new("1", "b.com"),
            UrlEntry::new("2", "a.com"),
        ];
        assert_eq!(domains(&entries), vec!["b.com", "a.com"]);
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(
            normalize_host("https://www.Example.com/a/b?c=d").unwrap(),
            "example.com"
        );
        assert_eq!(normalize_host("facebook.com").unwrap(), "facebook.com");
        assert_eq!(normalize_host("www.x.com").unwrap(), "x.com");
        assert_eq!(
            normalize_host("  http://sub.site.org  ").unwrap(),
            "sub.site.org"
        );
        assert!(normalize_host("").is_err());
        assert!(normalize_host("http://").is_err());
    }
}
