use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use wellora_core::domain::feedback::{EngagementFeedback, FeedbackId};
use wellora_core::domain::user::UserId;

use super::{format_timestamp, parse_timestamp, EngagementRepository, RepositoryError};
use crate::DbPool;

pub struct SqlEngagementRepository {
    pool: DbPool,
}

impl SqlEngagementRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EngagementRepository for SqlEngagementRepository {
    async fn append(&self, feedback: EngagementFeedback) -> Result<(), RepositoryError> {
        let tips_used_json = serde_json::to_string(&feedback.tips_used)
            .map_err(|e| RepositoryError::Decode(format!("tips_used is not encodable: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO engagement_feedback (
                id, user_id, topic, rating, tips_used_json, comments, submitted_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&feedback.id.0)
        .bind(&feedback.user_id.0)
        .bind(&feedback.topic)
        .bind(feedback.rating)
        .bind(tips_used_json)
        .bind(&feedback.comments)
        .bind(format_timestamp(&feedback.submitted_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_topic(
        &self,
        user_id: &UserId,
        topic: &str,
    ) -> Result<Vec<EngagementFeedback>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, topic, rating, tips_used_json, comments, submitted_at
            FROM engagement_feedback
            WHERE user_id = ? AND topic = ?
            ORDER BY submitted_at DESC, rowid DESC
            "#,
        )
        .bind(&user_id.0)
        .bind(topic)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(engagement_from_row).collect()
    }
}

fn engagement_from_row(row: &SqliteRow) -> Result<EngagementFeedback, RepositoryError> {
    let tips_used_json: String = row.try_get("tips_used_json")?;
    let submitted_at: String = row.try_get("submitted_at")?;

    Ok(EngagementFeedback {
        id: FeedbackId(row.try_get("id")?),
        user_id: UserId(row.try_get("user_id")?),
        topic: row.try_get("topic")?,
        rating: row.try_get("rating")?,
        tips_used: serde_json::from_str(&tips_used_json)
            .map_err(|e| RepositoryError::Decode(format!("invalid tips_used_json: {e}")))?,
        comments: row.try_get("comments")?,
        submitted_at: parse_timestamp("submitted_at", submitted_at)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use wellora_core::domain::feedback::EngagementFeedback;
    use wellora_core::domain::user::UserId;

    use super::SqlEngagementRepository;
    use crate::repositories::EngagementRepository;
    use crate::{connect_with_settings, migrations, DbPool};

    async fn setup_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    #[tokio::test]
    async fn sql_engagement_repo_round_trips_tips_and_orders_newest_first() {
        let pool = setup_pool().await;
        let repo = SqlEngagementRepository::new(pool.clone());
        let user = UserId("user-1".to_string());
        let base = Utc.with_ymd_and_hms(2026, 4, 2, 18, 0, 0).single().expect("timestamp");

        let first = EngagementFeedback::new(user.clone(), "Work", Some(3))
            .with_tips_used(vec!["Chamomile tea before bed".to_string()])
            .submitted_at(base);
        let second = EngagementFeedback::new(user.clone(), "Work", Some(4))
            .with_tips_used(vec!["Box breathing".to_string(), "Walks".to_string()])
            .with_comments("sleeping better")
            .submitted_at(base + Duration::hours(20));
        let other_topic = EngagementFeedback::new(user.clone(), "Hairfall", None);

        repo.append(first.clone()).await.expect("append first");
        repo.append(second.clone()).await.expect("append second");
        repo.append(other_topic).await.expect("append other topic");

        let listed = repo.list_for_topic(&user, "Work").await.expect("list");
        assert_eq!(listed, vec![second, first]);

        pool.close().await;
    }
}
