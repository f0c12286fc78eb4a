// src/triage/rules.rs
//! Triage rules and their JSON file format.
//!
//! ```json
//! [
//!   { "match": { "title_regex": "^invoice" }, "destination": { "database": "<id or url>" } },
//!   { "match": { "contains": "recipe" },      "destination": { "page": "<id or url>" } }
//! ]
//! ```

use crate::error::AppError;
use crate::model::Destination;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::path::Path;

/// Title predicate. Both forms ignore case.
#[derive(Debug, Clone)]
pub enum RuleMatcher {
    TitleRegex(Regex),
    /// Stored lower-cased.
    Contains(String),
}

impl RuleMatcher {
    pub fn title_regex(pattern: &str) -> Result<Self, AppError> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(RuleMatcher::TitleRegex(regex))
    }

    pub fn contains(needle: &str) -> Result<Self, AppError> {
        if needle.is_empty() {
            return Err(AppError::InvalidRule(
                "'contains' needs a non-empty string".to_string(),
            ));
        }
        Ok(RuleMatcher::Contains(needle.to_lowercase()))
    }

    pub fn matches(&self, title: &str) -> bool {
        match self {
            RuleMatcher::TitleRegex(regex) => regex.is_match(title),
            RuleMatcher::Contains(needle) => title.to_lowercase().contains(needle.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TriageRule {
    pub matcher: RuleMatcher,
    pub destination: Destination,
}

impl TriageRule {
    pub fn new(matcher: RuleMatcher, destination: Destination) -> Self {
        Self {
            matcher,
            destination,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum MatchSpec {
    TitleRegex(String),
    Contains(String),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSpec {
    #[serde(rename = "match")]
    matcher: MatchSpec,
    destination: Destination,
}

/// Parses a JSON rule list. Order is preserved; it decides precedence.
pub fn parse_rules(json: &str) -> Result<Vec<TriageRule>, AppError> {
    let specs: Vec<RuleSpec> =
        serde_json::from_str(json).map_err(|e| AppError::InvalidRule(e.to_string()))?;

    specs
        .into_iter()
        .enumerate()
        .map(|(index, spec)| -> Result<TriageRule, AppError> {
            let matcher = match &spec.matcher {
                MatchSpec::TitleRegex(pattern) => RuleMatcher::title_regex(pattern),
                MatchSpec::Contains(needle) => RuleMatcher::contains(needle),
            }
            .map_err(|e| AppError::InvalidRule(format!("rule {}: {}", index + 1, e)))?;
            Ok(TriageRule::new(matcher, spec.destination))
        })
        .collect()
}

pub fn load_rules(path: &Path) -> Result<Vec<TriageRule>, AppError> {
    let rules = parse_rules(&std::fs::read_to_string(path)?)?;
    log::debug!("Loaded {} triage rules from {}", rules.len(), path.display());
    Ok(rules)
}
