use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use wellora_core::domain::feedback::{FeedbackId, SatisfactionLevel, ScalpFeedback};
use wellora_core::domain::user::UserId;

use super::{format_timestamp, parse_timestamp, RepositoryError, ScalpFeedbackRepository};
use crate::DbPool;

pub struct SqlScalpFeedbackRepository {
    pool: DbPool,
}

impl SqlScalpFeedbackRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScalpFeedbackRepository for SqlScalpFeedbackRepository {
    async fn append(&self, feedback: ScalpFeedback) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO scalp_feedback (
                id, user_id, topic, satisfaction_level, followed_routine, product_helpful,
                remedies_helpful, comments, submitted_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&feedback.id.0)
        .bind(&feedback.user_id.0)
        .bind(&feedback.topic)
        .bind(feedback.satisfaction_level.label())
        .bind(feedback.followed_routine)
        .bind(feedback.product_helpful)
        .bind(feedback.remedies_helpful)
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
    ) -> Result<Vec<ScalpFeedback>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id, user_id, topic, satisfaction_level, followed_routine, product_helpful,
                remedies_helpful, comments, submitted_at
            FROM scalp_feedback
            WHERE user_id = ? AND topic = ?
            ORDER BY submitted_at DESC, rowid DESC
            "#,
        )
        .bind(&user_id.0)
        .bind(topic)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(scalp_from_row).collect()
    }
}

fn scalp_from_row(row: &SqliteRow) -> Result<ScalpFeedback, RepositoryError> {
    let satisfaction_level: String = row.try_get("satisfaction_level")?;
    let submitted_at: String = row.try_get("submitted_at")?;

    Ok(ScalpFeedback {
        id: FeedbackId(row.try_get("id")?),
        user_id: UserId(row.try_get("user_id")?),
        topic: row.try_get("topic")?,
        satisfaction_level: SatisfactionLevel::parse(&satisfaction_level),
        followed_routine: row.try_get("followed_routine")?,
        product_helpful: row.try_get("product_helpful")?,
        remedies_helpful: row.try_get("remedies_helpful")?,
        comments: row.try_get("comments")?,
        submitted_at: parse_timestamp("submitted_at", submitted_at)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use wellora_core::domain::feedback::{SatisfactionLevel, ScalpFeedback};
    use wellora_core::domain::user::UserId;

    use super::SqlScalpFeedbackRepository;
    use crate::repositories::ScalpFeedbackRepository;
    use crate::{connect_with_settings, migrations, DbPool};

    async fn setup_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    #[tokio::test]
    async fn sql_scalp_repo_keeps_flags_and_orders_newest_first() {
        let pool = setup_pool().await;
        let repo = SqlScalpFeedbackRepository::new(pool.clone());
        let user = UserId("user-1".to_string());
        let base = Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).single().expect("timestamp");

        let first = ScalpFeedback::new(user.clone(), "hairfall", SatisfactionLevel::Neutral)
            .submitted_at(base);
        let second = ScalpFeedback::new(user.clone(), "hairfall", SatisfactionLevel::Satisfied)
            .with_flags(true, false, true)
            .with_comments("less shedding")
            .submitted_at(base + Duration::days(7));
        let other_topic = ScalpFeedback::new(user.clone(), "dandruff", SatisfactionLevel::Satisfied);

        repo.append(first.clone()).await.expect("append first");
        repo.append(second.clone()).await.expect("append second");
        repo.append(other_topic).await.expect("append other topic");

        let listed = repo.list_for_topic(&user, "hairfall").await.expect("list");
        assert_eq!(listed, vec![second, first]);
        assert!(repo
            .list_for_topic(&UserId("user-2".to_string()), "hairfall")
            .await
            .expect("list other user")
            .is_empty());

        pool.close().await;
    }
}
