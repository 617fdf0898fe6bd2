use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::feedback::FeedbackId;
use crate::domain::user::UserId;
use crate::errors::DomainError;
use crate::womens::{ExerciseFrequency, PainLevel};

/// Highest self-rated overall score for a cycle.
pub const MAX_OVERALL_SCORE: u8 = 10;

/// One menstrual-cycle check-in. Append-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleCheckIn {
    pub id: FeedbackId,
    pub user_id: UserId,
    /// Free text from the form, e.g. `"28 days"` or `"irregular"`.
    #[serde(default)]
    pub cycle_length: String,
    pub pain_level: PainLevel,
    pub sleep_hours: u32,
    pub exercise_frequency: ExerciseFrequency,
    #[serde(default)]
    pub products_used: String,
    pub overall_score: u8,
    pub submitted_at: DateTime<Utc>,
}

impl CycleCheckIn {
    pub fn new(
        user_id: UserId,
        pain_level: PainLevel,
        exercise_frequency: ExerciseFrequency,
        sleep_hours: u32,
        overall_score: u8,
    ) -> Self {
        Self {
            id: FeedbackId::generate(),
            user_id,
            cycle_length: String::new(),
            pain_level,
            sleep_hours,
            exercise_frequency,
            products_used: String::new(),
            overall_score,
            submitted_at: Utc::now(),
        }
    }

    pub fn with_cycle_length(mut self, cycle_length: impl Into<String>) -> Self {
        self.cycle_length = cycle_length.into();
        self
    }

    pub fn with_products_used(mut self, products_used: impl Into<String>) -> Self {
        self.products_used = products_used.into();
        self
    }

    pub fn submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.overall_score > MAX_OVERALL_SCORE {
            return Err(DomainError::InvariantViolation(format!(
                "overall_score {} is above {MAX_OVERALL_SCORE}",
                self.overall_score
            )));
        }
        if self.sleep_hours > 24 {
            return Err(DomainError::InvariantViolation(format!(
                "sleep_hours {} is more than a day",
                self.sleep_hours
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CycleCheckIn;
    use crate::domain::user::UserId;
    use crate::womens::{ExerciseFrequency, PainLevel};

    #[test]
    fn score_and_sleep_are_bounded() {
        let user = UserId("user-1".to_string());
        let check_in = |sleep, score| {
            CycleCheckIn::new(user.clone(), PainLevel::Low, ExerciseFrequency::Often, sleep, score)
        };

        assert!(check_in(7, 10).validate().is_ok());
        assert!(check_in(7, 11).validate().is_err());
        assert!(check_in(25, 5).validate().is_err());
    }
}
