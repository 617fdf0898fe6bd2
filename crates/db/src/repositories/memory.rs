use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use tokio::sync::RwLock;

use wellora_core::domain::analysis::AnalysisRecord;
use wellora_core::domain::checkin::CycleCheckIn;
use wellora_core::domain::feedback::{EngagementFeedback, FeedbackRecord, ScalpFeedback};
use wellora_core::domain::user::{UserAccount, UserId};

use super::{
    AnalysisRepository, CycleCheckInRepository, EngagementRepository, FeedbackRepository,
    RepositoryError, ScalpFeedbackRepository, UserRepository,
};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, UserAccount>>,
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.get(&id.0).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.values().find(|account| account.username == username).cloned())
    }

    async fn save(&self, account: UserAccount) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        users.insert(account.id.0.clone(), account);
        Ok(())
    }
}

/// Newest first, insertion order reversed on equal timestamps.
fn newest_first<T: Clone>(
    records: &[T],
    keep: impl Fn(&T) -> bool,
    timestamp: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut selected: Vec<T> = records.iter().rev().filter(|record| keep(*record)).cloned().collect();
    selected.sort_by_key(|record| Reverse(timestamp(record)));
    selected
}

#[derive(Default)]
pub struct InMemoryFeedbackRepository {
    records: RwLock<Vec<FeedbackRecord>>,
}

#[async_trait::async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn append(&self, record: FeedbackRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        records.push(record);
        Ok(())
    }

    async fn list_for_issue(
        &self,
        user_id: &UserId,
        issue: &str,
    ) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        let records = self.records.read().await;
        Ok(newest_first(
            records.as_slice(),
            |record| record.user_id == *user_id && record.issue == issue,
            |record| record.submitted_at,
        ))
    }
}

#[derive(Default)]
pub struct InMemoryEngagementRepository {
    feedback: RwLock<Vec<EngagementFeedback>>,
}

#[async_trait::async_trait]
impl EngagementRepository for InMemoryEngagementRepository {
    async fn append(&self, feedback: EngagementFeedback) -> Result<(), RepositoryError> {
        let mut stored = self.feedback.write().await;
        stored.push(feedback);
        Ok(())
    }

    async fn list_for_topic(
        &self,
        user_id: &UserId,
        topic: &str,
    ) -> Result<Vec<EngagementFeedback>, RepositoryError> {
        let stored = self.feedback.read().await;
        Ok(newest_first(
            stored.as_slice(),
            |feedback| feedback.user_id == *user_id && feedback.topic == topic,
            |feedback| feedback.submitted_at,
        ))
    }
}

#[derive(Default)]
pub struct InMemoryAnalysisRepository {
    records: RwLock<Vec<AnalysisRecord>>,
}

#[async_trait::async_trait]
impl AnalysisRepository for InMemoryAnalysisRepository {
    async fn append(&self, record: AnalysisRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        records.push(record);
        Ok(())
    }

    async fn latest_for_issue(
        &self,
        user_id: &UserId,
        issue: &str,
    ) -> Result<Option<AnalysisRecord>, RepositoryError> {
        let records = self.records.read().await;
        Ok(newest_first(
            records.as_slice(),
            |record| record.user_id == *user_id && record.query.issue == issue,
            |record| record.created_at,
        )
        .into_iter()
        .next())
    }
}

#[derive(Default)]
pub struct InMemoryScalpFeedbackRepository {
    feedback: RwLock<Vec<ScalpFeedback>>,
}

#[async_trait::async_trait]
impl ScalpFeedbackRepository for InMemoryScalpFeedbackRepository {
    async fn append(&self, feedback: ScalpFeedback) -> Result<(), RepositoryError> {
        self.feedback.write().await.push(feedback);
        Ok(())
    }

    async fn list_for_topic(
        &self,
        user_id: &UserId,
        topic: &str,
    ) -> Result<Vec<ScalpFeedback>, RepositoryError> {
        let stored = self.feedback.read().await;
        Ok(newest_first(
            stored.as_slice(),
            |feedback| feedback.user_id == *user_id && feedback.topic == topic,
            |feedback| feedback.submitted_at,
        ))
    }
}

#[derive(Default)]
pub struct InMemoryCycleCheckInRepository {
    check_ins: RwLock<Vec<CycleCheckIn>>,
}

#[async_trait::async_trait]
impl CycleCheckInRepository for InMemoryCycleCheckInRepository {
    async fn append(&self, check_in: CycleCheckIn) -> Result<(), RepositoryError> {
        self.check_ins.write().await.push(check_in);
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<CycleCheckIn>, RepositoryError> {
        let stored = self.check_ins.read().await;
        Ok(newest_first(
            stored.as_slice(),
            |check_in| check_in.user_id == *user_id,
            |check_in| check_in.submitted_at,
        ))
    }
}
