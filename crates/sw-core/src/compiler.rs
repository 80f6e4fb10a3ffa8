//! Domain list -> dynamic rule compilation
//!
//! Compilation is pure and deterministic: the rule for input position `i`
//! always gets id `FIRST_RULE_ID + i`, the same pattern, the same action.
//! No platform calls happen here; the synchronizer owns the side effects.

use crate::rule::{
    reserved_rule_ids, Rule, RuleAction, RuleCondition, ResourceType, RuleUpdate, FIRST_RULE_ID,
    MAX_RULES,
};

/// Error type for rule compilation.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("{count} blocked entries exceed the reserved id range capacity of {capacity}")]
    CapacityExceeded { count: usize, capacity: usize },
}

/// Build the urlFilter pattern for one domain.
///
/// `||domain^` matches the domain itself and every subdomain, anchored at a
/// host-label boundary, so `||example.com^` matches `sub.example.com` but not
/// `notexample.com` or `example.com.evil.com`.
pub fn url_filter(domain: &str) -> String {
    format!("||{domain}^")
}

/// Compile an ordered domain list into an equal-length rule list.
///
/// Rejects lists longer than [`MAX_RULES`]; callers that prefer availability
/// over strictness truncate and retry (see the synchronizer).
pub fn compile_rules<S: AsRef<str>>(domains: &[S]) -> Result<Vec<Rule>, CompileError> {
    if domains.len() > MAX_RULES {
        return Err(CompileError::CapacityExceeded {
            count: domains.len(),
            capacity: MAX_RULES,
        });
    }

    Ok(domains
        .iter()
        .enumerate()
        .map(|(idx, domain)| Rule {
            id: FIRST_RULE_ID + idx as u32,
            priority: 1,
            action: RuleAction::redirect_to_warning(),
            condition: RuleCondition {
                url_filter: url_filter(domain.as_ref()),
                resource_types: vec![ResourceType::MainFrame],
            },
        })
        .collect())
}

/// Compile a full replace payload: the removal set is always the entire
/// reserved id range, regardless of how many rules are currently active.
pub fn compile_update<S: AsRef<str>>(domains: &[S]) -> Result<RuleUpdate, CompileError> {
    Ok(RuleUpdate {
        remove_rule_ids: reserved_rule_ids(),
        add_rules: compile_rules(domains)?,
    })
}
