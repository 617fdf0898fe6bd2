use rust_decimal::Decimal;
use serde::Serialize;

use super::{ProgressScorer, ProgressValue};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredEntry<T> {
    pub record: T,
    pub progress: ProgressValue,
}

/// Per-submission progress plus the rounded mean over all of them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProgressHistory<T> {
    pub entries: Vec<ScoredEntry<T>>,
    pub average: ProgressValue,
}

impl<T> ProgressHistory<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scores every record independently, keeping input order.
///
/// The average is rounded to one decimal place; an empty input averages 0.
pub fn aggregate<S>(scorer: &S, records: Vec<S::Feedback>) -> ProgressHistory<S::Feedback>
where
    S: ProgressScorer,
{
    let entries: Vec<ScoredEntry<S::Feedback>> = records
        .into_iter()
        .map(|record| {
            let progress = scorer.score(&record);
            ScoredEntry { record, progress }
        })
        .collect();

    let average = if entries.is_empty() {
        ProgressValue::zero(scorer.scale())
    } else {
        let total: Decimal = entries.iter().map(|entry| entry.progress.value()).sum();
        let mean = total / Decimal::from(entries.len() as u64);
        ProgressValue::new(mean.round_dp(1), scorer.scale())
    };

    ProgressHistory { entries, average }
}

/// Average progress for one directory issue.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IssueProgress {
    pub slug: String,
    pub display_name: String,
    pub average: ProgressValue,
    pub submissions: usize,
}
