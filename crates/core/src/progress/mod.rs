//! Progress scoring for feedback submissions.
//!
//! Each strategy is a named [`ProgressScorer`]; the ten-point and
//! hundred-point laws have different inputs and scales and are kept apart.
//! Values are recomputed from stored feedback on every read.

mod history;
mod scoring;

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use history::{aggregate, IssueProgress, ProgressHistory, ScoredEntry};
pub use scoring::{
    CycleScorer, HundredPointScorer, ImprovementScorer, ImprovementTable, ProgressWeights,
    TenPointScorer,
};

/// Default ten-point weights: satisfaction 0.5, rating 0.3, resolution 0.2.
pub const DEFAULT_WEIGHTS: ProgressWeights = ProgressWeights {
    satisfaction: Decimal::from_parts(5, 0, 0, false, 1),
    rating: Decimal::from_parts(3, 0, 0, false, 1),
    resolution: Decimal::from_parts(2, 0, 0, false, 1),
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressScale {
    TenPoint,
    Hundred,
}

impl ProgressScale {
    pub fn ceiling(&self) -> Decimal {
        match self {
            Self::TenPoint => Decimal::TEN,
            Self::Hundred => Decimal::ONE_HUNDRED,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TenPoint => "ten_point",
            Self::Hundred => "hundred",
        }
    }
}

/// A progress value on a known scale. Construction clamps the ceiling only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressValue {
    value: Decimal,
    scale: ProgressScale,
}

impl ProgressValue {
    pub fn new(value: Decimal, scale: ProgressScale) -> Self {
        Self { value: value.min(scale.ceiling()), scale }
    }

    pub fn zero(scale: ProgressScale) -> Self {
        Self { value: Decimal::ZERO, scale }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn scale(&self) -> ProgressScale {
        self.scale
    }
}

impl fmt::Display for ProgressValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.scale.ceiling())
    }
}

pub trait ProgressScorer {
    type Feedback;

    fn scale(&self) -> ProgressScale;

    fn score(&self, feedback: &Self::Feedback) -> ProgressValue;
}
