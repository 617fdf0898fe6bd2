use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ProgressScale, ProgressScorer, ProgressValue, DEFAULT_WEIGHTS};
use crate::domain::checkin::CycleCheckIn;
use crate::domain::feedback::{EngagementFeedback, FeedbackRecord, SatisfactionLevel, ScalpFeedback};
use crate::errors::DomainError;

/// Weights for the ten-point law.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressWeights {
    pub satisfaction: Decimal,
    pub rating: Decimal,
    pub resolution: Decimal,
}

impl Default for ProgressWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

/// Skin and menstrual feedback on a 0-10 scale.
///
/// `round(satisfaction * 0.5 + rating * 0.3 + solved * 0.2, 1)`, capped at 10.
/// A missing rating contributes nothing; an unrecognized satisfaction level
/// scores 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TenPointScorer {
    weights: ProgressWeights,
}

impl TenPointScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ProgressWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> ProgressWeights {
        self.weights
    }

    pub fn satisfaction_points(level: &SatisfactionLevel) -> Decimal {
        let points = match level {
            SatisfactionLevel::VerySatisfied => 10,
            SatisfactionLevel::Satisfied => 8,
            SatisfactionLevel::Neutral => 6,
            SatisfactionLevel::Dissatisfied => 4,
            SatisfactionLevel::VeryDissatisfied => 2,
            SatisfactionLevel::Unrecognized(_) => 0,
        };
        Decimal::from(points)
    }
}

impl ProgressScorer for TenPointScorer {
    type Feedback = FeedbackRecord;

    fn scale(&self) -> ProgressScale {
        ProgressScale::TenPoint
    }

    fn score(&self, feedback: &FeedbackRecord) -> ProgressValue {
        let satisfaction = Self::satisfaction_points(&feedback.satisfaction_level);
        let rating = Decimal::from(feedback.effectiveness_rating.unwrap_or(0));
        let resolution = if feedback.problem_solved { Decimal::TEN } else { Decimal::ZERO };

        let raw = satisfaction * self.weights.satisfaction
            + rating * self.weights.rating
            + resolution * self.weights.resolution;

        ProgressValue::new(raw.round_dp(1), self.scale())
    }
}

/// Hair and stress engagement on a 0-100 scale.
///
/// `30 + rating * 6 + distinct tips * 10 + 5 when comments are present`,
/// capped at 100. Tips are compared trimmed and case-folded; blank tips are
/// ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HundredPointScorer;

impl HundredPointScorer {
    const BASE: i64 = 30;
    const PER_RATING_POINT: i64 = 6;
    const PER_TIP: i64 = 10;
    const COMMENT_BONUS: i64 = 5;

    pub fn distinct_tips(tips: &[String]) -> usize {
        tips.iter()
            .map(|tip| tip.trim().to_lowercase())
            .filter(|tip| !tip.is_empty())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

impl ProgressScorer for HundredPointScorer {
    type Feedback = EngagementFeedback;

    fn scale(&self) -> ProgressScale {
        ProgressScale::Hundred
    }

    fn score(&self, feedback: &EngagementFeedback) -> ProgressValue {
        let rating = i64::from(feedback.rating.unwrap_or(0));
        let tips = i64::try_from(Self::distinct_tips(&feedback.tips_used)).unwrap_or(i64::MAX / 2);
        let comments = if feedback.comments.trim().is_empty() { 0 } else { Self::COMMENT_BONUS };

        let raw = Self::BASE
            .saturating_add(rating.saturating_mul(Self::PER_RATING_POINT))
            .saturating_add(tips.saturating_mul(Self::PER_TIP))
            .saturating_add(comments);

        ProgressValue::new(Decimal::from(raw), self.scale())
    }
}

/// Satisfaction-to-percentage table for scalp improvement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementTable {
    Hairfall,
    Dandruff,
}

impl ImprovementTable {
    const UNRECOGNIZED: u32 = 50;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hairfall => "hairfall",
            Self::Dandruff => "dandruff",
        }
    }

    pub fn points(&self, level: &SatisfactionLevel) -> u32 {
        match (self, level) {
            (Self::Hairfall, SatisfactionLevel::VerySatisfied) => 90,
            (Self::Dandruff, SatisfactionLevel::VerySatisfied) => 80,
            (_, SatisfactionLevel::Satisfied) => 75,
            (Self::Hairfall, SatisfactionLevel::Neutral) => 50,
            (Self::Dandruff, SatisfactionLevel::Neutral) => 40,
            (_, SatisfactionLevel::Dissatisfied) => 30,
            (_, SatisfactionLevel::VeryDissatisfied) => 10,
            (_, SatisfactionLevel::Unrecognized(_)) => Self::UNRECOGNIZED,
        }
    }
}

impl FromStr for ImprovementTable {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace([' ', '_', '-'], "").as_str() {
            "hairfall" | "hairloss" => Ok(Self::Hairfall),
            "dandruff" => Ok(Self::Dandruff),
            other => Err(DomainError::InvariantViolation(format!(
                "no improvement table for topic `{other}` (expected hairfall|dandruff)"
            ))),
        }
    }
}

/// Scalp-care improvement percentage: table points plus 5 for each helpful
/// or followed flag, capped at 100.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImprovementScorer {
    table: ImprovementTable,
}

impl ImprovementScorer {
    const FLAG_BONUS: u32 = 5;

    pub fn new(table: ImprovementTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> ImprovementTable {
        self.table
    }
}

impl ProgressScorer for ImprovementScorer {
    type Feedback = ScalpFeedback;

    fn scale(&self) -> ProgressScale {
        ProgressScale::Hundred
    }

    fn score(&self, feedback: &ScalpFeedback) -> ProgressValue {
        let flags = [feedback.followed_routine, feedback.product_helpful, feedback.remedies_helpful];
        let bonus = flags.iter().filter(|flag| **flag).count() as u32 * Self::FLAG_BONUS;
        let raw = self.table.points(&feedback.satisfaction_level) + bonus;

        ProgressValue::new(Decimal::from(raw), self.scale())
    }
}

/// Cycle check-ins on the 0-10 scale: the self-rated overall score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleScorer;

impl ProgressScorer for CycleScorer {
    type Feedback = CycleCheckIn;

    fn scale(&self) -> ProgressScale {
        ProgressScale::TenPoint
    }

    fn score(&self, check_in: &CycleCheckIn) -> ProgressValue {
        ProgressValue::new(Decimal::from(check_in.overall_score), self.scale())
    }
}
