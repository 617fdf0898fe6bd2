use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use wellora_core::domain::analysis::AnalysisRecord;
use wellora_core::domain::checkin::CycleCheckIn;
use wellora_core::domain::feedback::{EngagementFeedback, FeedbackRecord, ScalpFeedback};
use wellora_core::domain::user::{UserAccount, UserId};

pub mod analysis;
pub mod cycle;
pub mod engagement;
pub mod feedback;
pub mod memory;
pub mod scalp;
pub mod user;

pub use analysis::SqlAnalysisRepository;
pub use cycle::SqlCycleCheckInRepository;
pub use engagement::SqlEngagementRepository;
pub use feedback::SqlFeedbackRepository;
pub use memory::{
    InMemoryAnalysisRepository, InMemoryCycleCheckInRepository, InMemoryEngagementRepository,
    InMemoryFeedbackRepository, InMemoryScalpFeedbackRepository, InMemoryUserRepository,
};
pub use scalp::SqlScalpFeedbackRepository;
pub use user::SqlUserRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, RepositoryError>;
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, RepositoryError>;
    async fn save(&self, account: UserAccount) -> Result<(), RepositoryError>;
}

/// Append-only store of ten-point feedback.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn append(&self, record: FeedbackRecord) -> Result<(), RepositoryError>;

    /// Newest first; submissions with equal timestamps come back in reverse
    /// insertion order.
    async fn list_for_issue(
        &self,
        user_id: &UserId,
        issue: &str,
    ) -> Result<Vec<FeedbackRecord>, RepositoryError>;
}

#[async_trait]
pub trait EngagementRepository: Send + Sync {
    async fn append(&self, feedback: EngagementFeedback) -> Result<(), RepositoryError>;

    /// Newest first.
    async fn list_for_topic(
        &self,
        user_id: &UserId,
        topic: &str,
    ) -> Result<Vec<EngagementFeedback>, RepositoryError>;
}

#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    async fn append(&self, record: AnalysisRecord) -> Result<(), RepositoryError>;

    async fn latest_for_issue(
        &self,
        user_id: &UserId,
        issue: &str,
    ) -> Result<Option<AnalysisRecord>, RepositoryError>;
}

/// Scalp check-ins keyed by improvement table name.
#[async_trait]
pub trait ScalpFeedbackRepository: Send + Sync {
    async fn append(&self, feedback: ScalpFeedback) -> Result<(), RepositoryError>;

    /// Newest first.
    async fn list_for_topic(
        &self,
        user_id: &UserId,
        topic: &str,
    ) -> Result<Vec<ScalpFeedback>, RepositoryError>;
}

#[async_trait]
pub trait CycleCheckInRepository: Send + Sync {
    async fn append(&self, check_in: CycleCheckIn) -> Result<(), RepositoryError>;

    /// Newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<CycleCheckIn>, RepositoryError>;
}

/// Fixed-width RFC 3339 so text ordering in SQLite matches time ordering.
pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_timestamp(column: &str, value: String) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(&value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("invalid timestamp in `{column}`: {e}")))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{format_timestamp, parse_timestamp};

    #[test]
    fn timestamps_are_fixed_width() {
        let early = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single().expect("timestamp");
        let later = early + chrono::Duration::milliseconds(5);

        let early_text = format_timestamp(&early);
        let later_text = format_timestamp(&later);

        assert_eq!(early_text.len(), later_text.len());
        assert!(early_text < later_text);
        assert_eq!(parse_timestamp("submitted_at", later_text).expect("parse"), later);
    }

    #[test]
    fn invalid_timestamp_names_the_column() {
        let error = parse_timestamp("created_at", "yesterday".to_string()).expect_err("invalid");
        assert!(error.to_string().contains("created_at"));
    }
}
