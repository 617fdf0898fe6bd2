use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use wellora_core::domain::feedback::{
    FeedbackId, FeedbackRecord, RoutineAdherence, SatisfactionLevel,
};
use wellora_core::domain::user::UserId;

use super::{format_timestamp, parse_timestamp, FeedbackRepository, RepositoryError};
use crate::DbPool;

pub struct SqlFeedbackRepository {
    pool: DbPool,
}

impl SqlFeedbackRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackRepository for SqlFeedbackRepository {
    async fn append(&self, record: FeedbackRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO feedback_history (
                id, user_id, issue, satisfaction_level, effectiveness_rating, problem_solved,
                followed_morning_routine, followed_night_routine, products_made_change,
                remedies_helpful, suggestions, submitted_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id.0)
        .bind(&record.user_id.0)
        .bind(&record.issue)
        .bind(record.satisfaction_level.label())
        .bind(record.effectiveness_rating)
        .bind(record.problem_solved)
        .bind(record.adherence.followed_morning_routine)
        .bind(record.adherence.followed_night_routine)
        .bind(record.adherence.products_made_change)
        .bind(record.adherence.remedies_helpful)
        .bind(&record.suggestions)
        .bind(format_timestamp(&record.submitted_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_issue(
        &self,
        user_id: &UserId,
        issue: &str,
    ) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id, user_id, issue, satisfaction_level, effectiveness_rating, problem_solved,
                followed_morning_routine, followed_night_routine, products_made_change,
                remedies_helpful, suggestions, submitted_at
            FROM feedback_history
            WHERE user_id = ? AND issue = ?
            ORDER BY submitted_at DESC, rowid DESC
            "#,
        )
        .bind(&user_id.0)
        .bind(issue)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(feedback_from_row).collect()
    }
}

fn feedback_from_row(row: &SqliteRow) -> Result<FeedbackRecord, RepositoryError> {
    let satisfaction_level: String = row.try_get("satisfaction_level")?;
    let submitted_at: String = row.try_get("submitted_at")?;

    Ok(FeedbackRecord {
        id: FeedbackId(row.try_get("id")?),
        user_id: UserId(row.try_get("user_id")?),
        issue: row.try_get("issue")?,
        satisfaction_level: SatisfactionLevel::parse(&satisfaction_level),
        effectiveness_rating: row.try_get("effectiveness_rating")?,
        problem_solved: row.try_get("problem_solved")?,
        adherence: RoutineAdherence {
            followed_morning_routine: row.try_get("followed_morning_routine")?,
            followed_night_routine: row.try_get("followed_night_routine")?,
            products_made_change: row.try_get("products_made_change")?,
            remedies_helpful: row.try_get("remedies_helpful")?,
        },
        suggestions: row.try_get("suggestions")?,
        submitted_at: parse_timestamp("submitted_at", submitted_at)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use wellora_core::domain::feedback::{FeedbackRecord, RoutineAdherence, SatisfactionLevel};
    use wellora_core::domain::user::UserId;

    use super::SqlFeedbackRepository;
    use crate::repositories::FeedbackRepository;
    use crate::{connect_with_settings, migrations, DbPool};

    async fn setup_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    #[tokio::test]
    async fn sql_feedback_repo_lists_newest_first_per_issue() {
        let pool = setup_pool().await;
        let repo = SqlFeedbackRepository::new(pool.clone());
        let user = UserId("user-1".to_string());
        let base = Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).single().expect("timestamp");

        let older = FeedbackRecord::new(
            user.clone(),
            "Pimples",
            SatisfactionLevel::Neutral,
            Some(4),
            false,
        )
        .submitted_at(base);
        let newer = FeedbackRecord::new(
            user.clone(),
            "Pimples",
            SatisfactionLevel::Satisfied,
            Some(8),
            true,
        )
        .with_adherence(RoutineAdherence {
            followed_morning_routine: true,
            remedies_helpful: true,
            ..RoutineAdherence::default()
        })
        .with_suggestions("add a night serum")
        .submitted_at(base + Duration::days(3));
        let other_issue =
            FeedbackRecord::new(user.clone(), "Dark Circles", SatisfactionLevel::Satisfied, None, false)
                .submitted_at(base + Duration::days(5));

        repo.append(older.clone()).await.expect("append older");
        repo.append(newer.clone()).await.expect("append newer");
        repo.append(other_issue).await.expect("append other issue");

        let listed = repo.list_for_issue(&user, "Pimples").await.expect("list");
        assert_eq!(listed, vec![newer, older]);

        pool.close().await;
    }

    #[tokio::test]
    async fn sql_feedback_repo_keeps_unrecognized_satisfaction_verbatim() {
        let pool = setup_pool().await;
        let repo = SqlFeedbackRepository::new(pool.clone());
        let user = UserId("user-2".to_string());
        let record = FeedbackRecord::new(
            user.clone(),
            "Pimples",
            SatisfactionLevel::parse("kind of ok"),
            None,
            false,
        );

        repo.append(record.clone()).await.expect("append");
        let listed = repo.list_for_issue(&user, "Pimples").await.expect("list");

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].satisfaction_level, SatisfactionLevel::Unrecognized("kind of ok".into()));
        assert_eq!(listed[0].effectiveness_rating, None);

        pool.close().await;
    }

    #[tokio::test]
    async fn sql_feedback_repo_returns_empty_history_for_unknown_user() {
        let pool = setup_pool().await;
        let repo = SqlFeedbackRepository::new(pool.clone());

        let listed =
            repo.list_for_issue(&UserId("nobody".to_string()), "Pimples").await.expect("list");
        assert!(listed.is_empty());

        pool.close().await;
    }
}
