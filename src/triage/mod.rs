// src/triage/mod.rs
//! Rule-based triage of inbox items.
//!
//! Planning is pure and is what the CLI does by default. Applying a plan
//! re-parents pages and only happens when explicitly requested.

mod engine;
mod rules;

pub use engine::{apply, plan, MoveOutcome, PlannedMove, TriageItem, TriagePlan, TriageReport};
pub use rules::{load_rules, parse_rules, RuleMatcher, TriageRule};
