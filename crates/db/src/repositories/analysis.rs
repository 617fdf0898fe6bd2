use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use wellora_core::catalog::{AdviceDomain, CatalogRecord};
use wellora_core::domain::analysis::{AnalysisId, AnalysisRecord};
use wellora_core::domain::query::{LifestyleFactors, UserQuery};
use wellora_core::domain::user::UserId;
use wellora_core::matching::MatchTier;

use super::{format_timestamp, parse_timestamp, AnalysisRepository, RepositoryError};
use crate::DbPool;

pub struct SqlAnalysisRepository {
    pool: DbPool,
}

impl SqlAnalysisRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisRepository for SqlAnalysisRepository {
    async fn append(&self, record: AnalysisRecord) -> Result<(), RepositoryError> {
        let result_json = serde_json::to_string(&record.result)
            .map_err(|e| RepositoryError::Decode(format!("result is not encodable: {e}")))?;
        let catalog_index = i64::try_from(record.catalog_index)
            .map_err(|e| RepositoryError::Decode(format!("catalog_index out of range: {e}")))?;
        let nearest_distance = match record.tier {
            MatchTier::Nearest { distance } => Some(distance),
            MatchTier::Exact | MatchTier::Alias => None,
        };

        sqlx::query(
            r#"
            INSERT INTO analysis_history (
                id, user_id, domain, issue, gender, skin_or_scalp_type, age, sleep_hours,
                water_intake, oily_scalp, chemical_treatment, makeup,
                catalog_index, tier, nearest_distance, result_json, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id.0)
        .bind(&record.user_id.0)
        .bind(record.domain.as_str())
        .bind(&record.query.issue)
        .bind(&record.query.gender)
        .bind(&record.query.skin_or_scalp_type)
        .bind(record.query.age.map(i64::from))
        .bind(record.query.sleep_hours.map(i64::from))
        .bind(record.query.factors.water_intake.as_deref())
        .bind(record.query.factors.oily_scalp.as_deref())
        .bind(record.query.factors.chemical_treatment.as_deref())
        .bind(record.query.factors.makeup.as_deref())
        .bind(catalog_index)
        .bind(record.tier.as_str())
        .bind(nearest_distance)
        .bind(result_json)
        .bind(format_timestamp(&record.created_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest_for_issue(
        &self,
        user_id: &UserId,
        issue: &str,
    ) -> Result<Option<AnalysisRecord>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT
                id, user_id, domain, issue, gender, skin_or_scalp_type, age, sleep_hours,
                water_intake, oily_scalp, chemical_treatment, makeup,
                catalog_index, tier, nearest_distance, result_json, created_at
            FROM analysis_history
            WHERE user_id = ? AND issue = ?
            ORDER BY created_at DESC, rowid DESC
            LIMIT 1
            "#,
        )
        .bind(&user_id.0)
        .bind(issue)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| analysis_from_row(&r)).transpose()
    }
}

fn analysis_from_row(row: &SqliteRow) -> Result<AnalysisRecord, RepositoryError> {
    let domain: String = row.try_get("domain")?;
    let tier: String = row.try_get("tier")?;
    let nearest_distance: Option<f64> = row.try_get("nearest_distance")?;
    let catalog_index: i64 = row.try_get("catalog_index")?;
    let age: Option<i64> = row.try_get("age")?;
    let sleep_hours: Option<i64> = row.try_get("sleep_hours")?;
    let result_json: String = row.try_get("result_json")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(AnalysisRecord {
        id: AnalysisId(row.try_get("id")?),
        user_id: UserId(row.try_get("user_id")?),
        domain: domain
            .parse::<AdviceDomain>()
            .map_err(|e| RepositoryError::Decode(format!("invalid domain: {e}")))?,
        query: UserQuery {
            issue: row.try_get("issue")?,
            gender: row.try_get("gender")?,
            skin_or_scalp_type: row.try_get("skin_or_scalp_type")?,
            age: decode_u32("age", age)?,
            sleep_hours: decode_u32("sleep_hours", sleep_hours)?,
            factors: LifestyleFactors {
                water_intake: row.try_get("water_intake")?,
                oily_scalp: row.try_get("oily_scalp")?,
                chemical_treatment: row.try_get("chemical_treatment")?,
                makeup: row.try_get("makeup")?,
            },
        },
        catalog_index: usize::try_from(catalog_index)
            .map_err(|e| RepositoryError::Decode(format!("invalid catalog_index: {e}")))?,
        tier: decode_tier(&tier, nearest_distance)?,
        result: serde_json::from_str::<CatalogRecord>(&result_json)
            .map_err(|e| RepositoryError::Decode(format!("invalid result_json: {e}")))?,
        created_at: parse_timestamp("created_at", created_at)?,
    })
}

fn decode_tier(tier: &str, nearest_distance: Option<f64>) -> Result<MatchTier, RepositoryError> {
    match (tier, nearest_distance) {
        ("exact", _) => Ok(MatchTier::Exact),
        ("alias", _) => Ok(MatchTier::Alias),
        ("nearest", Some(distance)) => Ok(MatchTier::Nearest { distance }),
        ("nearest", None) => {
            Err(RepositoryError::Decode("nearest tier is missing its distance".to_string()))
        }
        (other, _) => Err(RepositoryError::Decode(format!("invalid tier: {other}"))),
    }
}

fn decode_u32(column: &str, value: Option<i64>) -> Result<Option<u32>, RepositoryError> {
    value
        .map(u32::try_from)
        .transpose()
        .map_err(|e| RepositoryError::Decode(format!("invalid `{column}`: {e}")))
}
