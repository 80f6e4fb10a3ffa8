//! WebAssembly bindings for SiteWarden
//!
//! The extension's background script hands the stored entry list (or the
//! `newValue` half of a storage change event) to [`compile_update`] and
//! passes the result straight to `chrome.declarativeNetRequest.updateDynamicRules`.

use wasm_bindgen::prelude::*;

use sw_core::{host_covered_by, matches_url, url_filter, MAX_RULES, WARNING_PAGE_PATH};

/// Pull the domain strings out of a JS entry array. Elements may be plain
/// strings or `{id, url}` objects as stored under `blockedUrls`.
fn domains_from_js(entries: &JsValue) -> Result<Vec<String>, JsValue> {
    let array = js_sys::Array::from(entries);
    let mut domains = Vec::with_capacity(array.length() as usize);

    for value in array.iter() {
        if let Some(domain) = value.as_string() {
            domains.push(domain);
            continue;
        }
        let url = js_sys::Reflect::get(&value, &"url".into())
            .ok()
            .and_then(|v| v.as_string())
            .ok_or_else(|| {
                JsValue::from_str("entry must be a string or carry a string 'url' field")
            })?;
        domains.push(url);
    }
    Ok(domains)
}

/// Compile the full `updateDynamicRules` payload for the given entries:
/// `{removeRuleIds: <whole reserved range>, addRules: <one rule per entry>}`.
///
/// Over-capacity lists are truncated to the first 100 entries with a console
/// warning, matching the synchronizer's policy.
#[wasm_bindgen]
pub fn compile_update(entries: JsValue) -> Result<JsValue, JsValue> {
    let mut domains = domains_from_js(&entries)?;
    if domains.len() > MAX_RULES {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "{} blocked entries exceed the {MAX_RULES}-rule capacity; keeping the first {MAX_RULES}",
            domains.len()
        )));
        domains.truncate(MAX_RULES);
    }

    let update =
        sw_core::compile_update(&domains).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let json = serde_json::to_string(&update).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

/// The rule ids this extension owns. Useful for cleanup paths in JS.
#[wasm_bindgen]
pub fn reserved_rule_ids() -> Vec<u32> {
    sw_core::reserved_rule_ids()
}

/// Whether a main-frame navigation to `url` would hit one of the rules
/// compiled from `entries`.
#[wasm_bindgen]
pub fn would_block(url: &str, entries: JsValue) -> Result<bool, JsValue> {
    let domains = domains_from_js(&entries)?;
    Ok(domains
        .iter()
        .any(|domain| matches_url(&url_filter(domain), url)))
}

/// Whether `host` is `domain` or one of its subdomains.
#[wasm_bindgen]
pub fn host_matches(host: &str, domain: &str) -> bool {
    host_covered_by(host, domain)
}

/// Reduce user input to the bare hostname the store expects: no scheme, no
/// path, no leading `www.`, lowercase. The list-editing UI calls this
/// before writing an entry.
#[wasm_bindgen]
pub fn normalize_host(input: &str) -> Result<String, JsValue> {
    sw_core::normalize_host(input).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extension path of the warning page all blocked navigations redirect to.
#[wasm_bindgen]
pub fn warning_page_path() -> String {
    WARNING_PAGE_PATH.to_string()
}
