use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{AdviceDomain, CatalogRecord};
use crate::domain::query::UserQuery;
use crate::domain::user::UserId;
use crate::matching::{MatchOutcome, MatchTier};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisId(pub String);

/// The advice a user was shown, kept so the result can be reconstructed
/// next to later feedback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub user_id: UserId,
    pub domain: AdviceDomain,
    pub query: UserQuery,
    pub catalog_index: usize,
    pub tier: MatchTier,
    pub result: CatalogRecord,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn from_outcome(
        user_id: UserId,
        domain: AdviceDomain,
        query: UserQuery,
        outcome: &MatchOutcome<'_>,
    ) -> Self {
        Self {
            id: AnalysisId(Uuid::new_v4().to_string()),
            user_id,
            domain,
            query,
            catalog_index: outcome.index,
            tier: outcome.tier,
            result: outcome.record.clone(),
            created_at: Utc::now(),
        }
    }
}
