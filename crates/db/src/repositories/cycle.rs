use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use wellora_core::domain::checkin::CycleCheckIn;
use wellora_core::domain::feedback::FeedbackId;
use wellora_core::domain::user::UserId;

use super::{format_timestamp, parse_timestamp, CycleCheckInRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCycleCheckInRepository {
    pool: DbPool,
}

impl SqlCycleCheckInRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CycleCheckInRepository for SqlCycleCheckInRepository {
    async fn append(&self, check_in: CycleCheckIn) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO cycle_checkins (
                id, user_id, cycle_length, pain_level, sleep_hours, exercise_frequency,
                products_used, overall_score, submitted_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&check_in.id.0)
        .bind(&check_in.user_id.0)
        .bind(&check_in.cycle_length)
        .bind(check_in.pain_level.label())
        .bind(i64::from(check_in.sleep_hours))
        .bind(check_in.exercise_frequency.label())
        .bind(&check_in.products_used)
        .bind(i64::from(check_in.overall_score))
        .bind(format_timestamp(&check_in.submitted_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<CycleCheckIn>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id, user_id, cycle_length, pain_level, sleep_hours, exercise_frequency,
                products_used, overall_score, submitted_at
            FROM cycle_checkins
            WHERE user_id = ?
            ORDER BY submitted_at DESC, rowid DESC
            "#,
        )
        .bind(&user_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(check_in_from_row).collect()
    }
}

fn check_in_from_row(row: &SqliteRow) -> Result<CycleCheckIn, RepositoryError> {
    let pain_level: String = row.try_get("pain_level")?;
    let exercise_frequency: String = row.try_get("exercise_frequency")?;
    let sleep_hours: i64 = row.try_get("sleep_hours")?;
    let overall_score: i64 = row.try_get("overall_score")?;
    let submitted_at: String = row.try_get("submitted_at")?;

    Ok(CycleCheckIn {
        id: FeedbackId(row.try_get("id")?),
        user_id: UserId(row.try_get("user_id")?),
        cycle_length: row.try_get("cycle_length")?,
        pain_level: pain_level
            .parse()
            .map_err(|e| RepositoryError::Decode(format!("invalid pain_level: {e}")))?,
        sleep_hours: u32::try_from(sleep_hours)
            .map_err(|_| RepositoryError::Decode(format!("invalid sleep_hours {sleep_hours}")))?,
        exercise_frequency: exercise_frequency
            .parse()
            .map_err(|e| RepositoryError::Decode(format!("invalid exercise_frequency: {e}")))?,
        products_used: row.try_get("products_used")?,
        overall_score: u8::try_from(overall_score).map_err(|_| {
            RepositoryError::Decode(format!("invalid overall_score {overall_score}"))
        })?,
        submitted_at: parse_timestamp("submitted_at", submitted_at)?,
    })
}
