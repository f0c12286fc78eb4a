// src/triage/engine.rs
//! Planning and applying triage moves.

use super::rules::TriageRule;
use crate::error::AppError;
use crate::model::Destination;
use crate::pipeline::PageMover;
use crate::types::NotionId;
use std::fmt;

/// An inbox entry: a page and its plain title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageItem {
    pub id: NotionId,
    pub title: String,
}

impl TriageItem {
    pub fn new(id: NotionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub item: TriageItem,
    /// Zero-based position of the rule that matched.
    pub rule_index: usize,
    pub destination: Destination,
}

impl fmt::Display for PlannedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) -> {} [rule {}]",
            self.item.title,
            self.item.id,
            self.destination,
            self.rule_index + 1
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriagePlan {
    pub moves: Vec<PlannedMove>,
    /// Items no rule matched. They are never moved.
    pub unmatched: Vec<TriageItem>,
}

impl TriagePlan {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Assigns each item to the first rule that matches its title.
pub fn plan(items: &[TriageItem], rules: &[TriageRule]) -> TriagePlan {
    let mut plan = TriagePlan::default();

    for item in items {
        let hit = rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matcher.matches(&item.title));

        match hit {
            Some((rule_index, rule)) => plan.moves.push(PlannedMove {
                item: item.clone(),
                rule_index,
                destination: rule.destination.clone(),
            }),
            None => plan.unmatched.push(item.clone()),
        }
    }

    log::debug!(
        "Triage plan: {} moves, {} unmatched",
        plan.moves.len(),
        plan.unmatched.len()
    );
    plan
}

#[derive(Debug)]
pub struct MoveOutcome {
    pub planned: PlannedMove,
    pub result: Result<(), AppError>,
}

#[derive(Debug, Default)]
pub struct TriageReport {
    pub outcomes: Vec<MoveOutcome>,
}

impl TriageReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// `Ok` when every move succeeded. A mix of successes and failures is a
    /// `PartialBatchFailure` carrying the first error; if nothing moved,
    /// the first error is returned as is.
    pub fn into_result(self) -> Result<usize, AppError> {
        let succeeded = self.succeeded();
        let failed = self.failed();

        let first_error = self
            .outcomes
            .into_iter()
            .find_map(|outcome| outcome.result.err());

        match first_error {
            None => Ok(succeeded),
            Some(err) if succeeded == 0 => Err(err),
            Some(err) => Err(AppError::PartialBatchFailure {
                succeeded,
                failed,
                source: Box::new(err),
            }),
        }
    }
}

/// Executes planned moves one at a time, continuing past failures.
pub async fn apply(plan: &TriagePlan, mover: &dyn PageMover) -> TriageReport {
    let mut report = TriageReport::default();

    for planned in &plan.moves {
        let result = mover.move_page(&planned.item.id, &planned.destination).await;
        match &result {
            Ok(()) => log::info!("Moved {}", planned),
            Err(err) => log::warn!("Failed to move {}: {}", planned, err),
        }
        report.outcomes.push(MoveOutcome {
            planned: planned.clone(),
            result,
        });
    }

    report
}
