//! Advice and progress flows over the advice sources and the history stores.
//!
//! Matching and scoring never depend on the stores. A failed write during
//! [`AdviceService::recommend`] still returns the advice; history reads
//! report store failures as [`ApplicationError::Persistence`], which is
//! distinct from an empty history.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use wellora_core::catalog::{AdviceDomain, CatalogRecord};
use wellora_core::domain::analysis::AnalysisRecord;
use wellora_core::domain::checkin::CycleCheckIn;
use wellora_core::domain::feedback::{EngagementFeedback, FeedbackRecord, ScalpFeedback};
use wellora_core::domain::query::{normalize_label, UserQuery};
use wellora_core::domain::user::{UserAccount, UserId};
use wellora_core::errors::{ApplicationError, DomainError};
use wellora_core::matching::{MatchTier, Matcher};
use wellora_core::progress::{
    aggregate, CycleScorer, HundredPointScorer, ImprovementScorer, ImprovementTable,
    IssueProgress, ProgressHistory, TenPointScorer,
};
use wellora_core::sources::AdviceSources;
use wellora_core::stress::{StressAdvice, StressType};
use wellora_core::womens::{
    CycleTrend, MenstrualAdvice, MenstrualProfile, PregnancyAdvice, PregnancyProfile,
};

use crate::repositories::{
    AnalysisRepository, CycleCheckInRepository, EngagementRepository, FeedbackRepository,
    InMemoryAnalysisRepository, InMemoryCycleCheckInRepository, InMemoryEngagementRepository,
    InMemoryFeedbackRepository, InMemoryScalpFeedbackRepository, InMemoryUserRepository,
    RepositoryError, ScalpFeedbackRepository, SqlAnalysisRepository, SqlCycleCheckInRepository,
    SqlEngagementRepository, SqlFeedbackRepository, SqlScalpFeedbackRepository,
    SqlUserRepository, UserRepository,
};
use crate::DbPool;

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        ApplicationError::Persistence(error.to_string())
    }
}

/// Advice shown for one query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub domain: AdviceDomain,
    /// The query after normalization and issue resolution.
    pub query: UserQuery,
    pub issue_slug: Option<String>,
    pub catalog_index: usize,
    pub tier: MatchTier,
    pub record: CatalogRecord,
    /// False when the analysis history could not be written.
    pub history_recorded: bool,
}

/// Cycle check-in history with the chart series over it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CycleProgress {
    pub history: ProgressHistory<CycleCheckIn>,
    pub trend: CycleTrend,
}

/// Every store the service writes to or reads from.
#[derive(Clone)]
pub struct AdviceStores {
    pub users: Arc<dyn UserRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub engagement: Arc<dyn EngagementRepository>,
    pub analysis: Arc<dyn AnalysisRepository>,
    pub scalp: Arc<dyn ScalpFeedbackRepository>,
    pub cycles: Arc<dyn CycleCheckInRepository>,
}

impl AdviceStores {
    pub fn sql(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(SqlUserRepository::new(pool.clone())),
            feedback: Arc::new(SqlFeedbackRepository::new(pool.clone())),
            engagement: Arc::new(SqlEngagementRepository::new(pool.clone())),
            analysis: Arc::new(SqlAnalysisRepository::new(pool.clone())),
            scalp: Arc::new(SqlScalpFeedbackRepository::new(pool.clone())),
            cycles: Arc::new(SqlCycleCheckInRepository::new(pool.clone())),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::default()),
            feedback: Arc::new(InMemoryFeedbackRepository::default()),
            engagement: Arc::new(InMemoryEngagementRepository::default()),
            analysis: Arc::new(InMemoryAnalysisRepository::default()),
            scalp: Arc::new(InMemoryScalpFeedbackRepository::default()),
            cycles: Arc::new(InMemoryCycleCheckInRepository::default()),
        }
    }
}

pub struct AdviceService {
    sources: Arc<AdviceSources>,
    matcher: Matcher,
    scorer: TenPointScorer,
    stores: AdviceStores,
}

impl AdviceService {
    pub fn new(sources: Arc<AdviceSources>, stores: AdviceStores) -> Self {
        Self { sources, matcher: Matcher::default(), scorer: TenPointScorer::default(), stores }
    }

    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_scorer(mut self, scorer: TenPointScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn sources(&self) -> &AdviceSources {
        &self.sources
    }

    pub fn sources_handle(&self) -> Arc<AdviceSources> {
        Arc::clone(&self.sources)
    }

    /// Fails with [`DomainError::DuplicateUser`] when the username is taken.
    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
    ) -> Result<UserAccount, ApplicationError> {
        let account = UserAccount::new(username, email)?;

        let existing = self.stores.users.find_by_username(&account.username).await.map_err(
            |error| store_failure("user.read_failed", &account.id, &account.username, error),
        )?;
        if existing.is_some() {
            return Err(DomainError::DuplicateUser(account.username).into());
        }

        self.stores.users.save(account.clone()).await.map_err(|error| {
            store_failure("user.save_failed", &account.id, &account.username, error)
        })?;

        info!(
            event_name = "user.registered",
            user_id = %account.id,
            username = %account.username,
            "user registered"
        );
        Ok(account)
    }

    /// Looks `handle` up as a username first, then as a user id.
    pub async fn resolve_user(&self, handle: &str) -> Result<UserAccount, ApplicationError> {
        let handle = handle.trim();
        if handle.is_empty() {
            return Err(DomainError::UnknownUser(String::new()).into());
        }
        let subject = UserId(handle.to_string());

        let by_name = self
            .stores
            .users
            .find_by_username(handle)
            .await
            .map_err(|error| store_failure("user.read_failed", &subject, handle, error))?;
        if let Some(account) = by_name {
            return Ok(account);
        }

        self.stores
            .users
            .find_by_id(&subject)
            .await
            .map_err(|error| store_failure("user.read_failed", &subject, handle, error))?
            .ok_or_else(|| DomainError::UnknownUser(handle.to_string()).into())
    }

    pub async fn recommend(
        &self,
        user_id: &UserId,
        domain: AdviceDomain,
        query: &UserQuery,
    ) -> Recommendation {
        let catalog = self.sources.catalogs.for_domain(domain);
        let prepared = self.matcher.prepare(query);
        let outcome = self.matcher.resolve(catalog, &prepared);

        let analysis =
            AnalysisRecord::from_outcome(user_id.clone(), domain, prepared.clone(), &outcome);
        let history_recorded = match self.stores.analysis.append(analysis).await {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    event_name = "advice.analysis_store_failed",
                    user_id = %user_id,
                    issue = %prepared.issue,
                    error = %error,
                    "analysis history was not recorded"
                );
                false
            }
        };

        info!(
            event_name = "advice.recommended",
            user_id = %user_id,
            domain = %domain,
            issue = %prepared.issue,
            tier = outcome.tier.as_str(),
            catalog_index = outcome.index,
            "advice resolved"
        );

        Recommendation {
            domain,
            issue_slug: self.matcher.directory().slug_for(&prepared.issue).map(str::to_string),
            catalog_index: outcome.index,
            tier: outcome.tier,
            record: outcome.record.clone(),
            query: prepared,
            history_recorded,
        }
    }

    pub async fn latest_analysis(
        &self,
        user_id: &UserId,
        issue: &str,
    ) -> Result<Option<AnalysisRecord>, ApplicationError> {
        let issue = self.matcher.directory().resolve(issue);
        self.stores.analysis.latest_for_issue(user_id, &issue).await.map_err(|error| {
            store_failure("advice.analysis_read_failed", user_id, &issue, error)
        })
    }

    /// Appends then reads back, so the returned history includes `record`.
    pub async fn submit_feedback(
        &self,
        mut record: FeedbackRecord,
    ) -> Result<ProgressHistory<FeedbackRecord>, ApplicationError> {
        record.issue = self.matcher.directory().resolve(&record.issue);
        let user_id = record.user_id.clone();
        let issue = record.issue.clone();

        self.stores.feedback.append(record).await.map_err(|error| {
            store_failure("feedback.append_failed", &user_id, &issue, error)
        })?;

        self.progress(&user_id, &issue).await
    }

    pub async fn progress(
        &self,
        user_id: &UserId,
        issue: &str,
    ) -> Result<ProgressHistory<FeedbackRecord>, ApplicationError> {
        let issue = self.matcher.directory().resolve(issue);
        let records = self.stores.feedback.list_for_issue(user_id, &issue).await.map_err(
            |error| store_failure("feedback.read_failed", user_id, &issue, error),
        )?;

        Ok(aggregate(&self.scorer, records))
    }

    /// Average progress for every directory issue, in directory order.
    pub async fn overview(&self, user_id: &UserId) -> Result<Vec<IssueProgress>, ApplicationError> {
        let mut overview = Vec::with_capacity(self.matcher.directory().entries().len());

        for entry in self.matcher.directory().entries() {
            let history = self.progress(user_id, &entry.display_name).await?;
            overview.push(IssueProgress {
                slug: entry.canonical_slug().to_string(),
                display_name: entry.display_name.clone(),
                average: history.average,
                submissions: history.len(),
            });
        }

        Ok(overview)
    }

    pub async fn submit_engagement(
        &self,
        mut feedback: EngagementFeedback,
    ) -> Result<ProgressHistory<EngagementFeedback>, ApplicationError> {
        feedback.topic = normalize_label(&feedback.topic);
        let user_id = feedback.user_id.clone();
        let topic = feedback.topic.clone();

        self.stores.engagement.append(feedback).await.map_err(|error| {
            store_failure("engagement.append_failed", &user_id, &topic, error)
        })?;

        self.engagement_progress(&user_id, &topic).await
    }

    pub async fn engagement_progress(
        &self,
        user_id: &UserId,
        topic: &str,
    ) -> Result<ProgressHistory<EngagementFeedback>, ApplicationError> {
        let topic = normalize_label(topic);
        let records = self.stores.engagement.list_for_topic(user_id, &topic).await.map_err(
            |error| store_failure("engagement.read_failed", user_id, &topic, error),
        )?;

        Ok(aggregate(&HundredPointScorer, records))
    }

    pub fn stress_advice(&self, stress_type: StressType) -> StressAdvice {
        self.sources.stress_tips.select(stress_type)
    }

    /// The topic is stored under its improvement table name, so `hair loss`
    /// and `Hairfall` share one history.
    pub async fn submit_scalp_feedback(
        &self,
        mut feedback: ScalpFeedback,
    ) -> Result<ProgressHistory<ScalpFeedback>, ApplicationError> {
        let table = feedback.topic.parse::<ImprovementTable>()?;
        feedback.topic = table.as_str().to_string();
        let user_id = feedback.user_id.clone();

        self.stores.scalp.append(feedback).await.map_err(|error| {
            store_failure("scalp.append_failed", &user_id, table.as_str(), error)
        })?;

        self.scalp_progress(&user_id, table.as_str()).await
    }

    pub async fn scalp_progress(
        &self,
        user_id: &UserId,
        topic: &str,
    ) -> Result<ProgressHistory<ScalpFeedback>, ApplicationError> {
        let table = topic.parse::<ImprovementTable>()?;
        let records = self.stores.scalp.list_for_topic(user_id, table.as_str()).await.map_err(
            |error| store_failure("scalp.read_failed", user_id, table.as_str(), error),
        )?;

        Ok(aggregate(&ImprovementScorer::new(table), records))
    }

    pub fn menstrual_advice(&self, profile: &MenstrualProfile) -> MenstrualAdvice {
        self.sources.menstrual.advise(profile)
    }

    pub fn pregnancy_advice(
        &self,
        profile: &PregnancyProfile,
    ) -> Result<PregnancyAdvice, ApplicationError> {
        Ok(self.sources.pregnancy.advise(profile)?)
    }

    pub async fn submit_check_in(
        &self,
        check_in: CycleCheckIn,
    ) -> Result<CycleProgress, ApplicationError> {
        check_in.validate()?;
        let user_id = check_in.user_id.clone();

        self.stores.cycles.append(check_in).await.map_err(|error| {
            store_failure("cycle.append_failed", &user_id, "cycle", error)
        })?;

        self.cycle_progress(&user_id).await
    }

    pub async fn cycle_progress(&self, user_id: &UserId) -> Result<CycleProgress, ApplicationError> {
        let check_ins = self
            .stores
            .cycles
            .list_for_user(user_id)
            .await
            .map_err(|error| store_failure("cycle.read_failed", user_id, "cycle", error))?;

        let trend = CycleTrend::from_check_ins(&check_ins);
        Ok(CycleProgress { history: aggregate(&CycleScorer, check_ins), trend })
    }
}

fn store_failure(
    event_name: &'static str,
    user_id: &UserId,
    subject: &str,
    error: RepositoryError,
) -> ApplicationError {
    warn!(event_name, user_id = %user_id, subject = %subject, error = %error, "history store failure");
    ApplicationError::from(error)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use wellora_core::catalog::{AdviceDomain, Catalog, CatalogSet};
    use wellora_core::domain::analysis::AnalysisRecord;
    use wellora_core::domain::checkin::CycleCheckIn;
    use wellora_core::domain::feedback::{
        EngagementFeedback, FeedbackRecord, SatisfactionLevel, ScalpFeedback,
    };
    use wellora_core::domain::query::UserQuery;
    use wellora_core::domain::user::UserId;
    use wellora_core::errors::{ApplicationError, DomainError};
    use wellora_core::matching::MatchTier;
    use wellora_core::progress::ProgressScale;
    use wellora_core::sources::AdviceSources;
    use wellora_core::stress::{StressTips, StressType};
    use wellora_core::womens::{
        ExerciseFrequency, MenstrualGuide, MenstrualProfile, PainLevel, PregnancyGuide,
        PregnancyProfile,
    };

    use super::{AdviceService, AdviceStores};
    use crate::repositories::{AnalysisRepository, FeedbackRepository, RepositoryError};

    const SKINCARE: &str = r#"[
        {"SkinIssue": "Pimples", "Gender": "Female", "SkinType": "Oily", "MorningRoutine": "Gel cleanser"},
        {"SkinIssue": "Black/White Heads", "Gender": "Male", "SkinType": "Oily", "MorningRoutine": "BHA cleanser"},
        {"SkinIssue": "Dark Circles", "Gender": "Female", "SkinType": "Dry", "MorningRoutine": "Eye serum"}
    ]"#;

    const HAIR: &str = r#"[
        {"Issue": "Hairfall", "Gender": "Male", "Scalp_Type": "Oily", "Routine": "Mild shampoo"}
    ]"#;

    struct OfflineStore;

    #[async_trait]
    impl AnalysisRepository for OfflineStore {
        async fn append(&self, _record: AnalysisRecord) -> Result<(), RepositoryError> {
            Err(RepositoryError::Decode("store offline".to_string()))
        }

        async fn latest_for_issue(
            &self,
            _user_id: &UserId,
            _issue: &str,
        ) -> Result<Option<AnalysisRecord>, RepositoryError> {
            Err(RepositoryError::Decode("store offline".to_string()))
        }
    }

    #[async_trait]
    impl FeedbackRepository for OfflineStore {
        async fn append(&self, _record: FeedbackRecord) -> Result<(), RepositoryError> {
            Err(RepositoryError::Decode("store offline".to_string()))
        }

        async fn list_for_issue(
            &self,
            _user_id: &UserId,
            _issue: &str,
        ) -> Result<Vec<FeedbackRecord>, RepositoryError> {
            Err(RepositoryError::Decode("store offline".to_string()))
        }
    }

    fn sources() -> Arc<AdviceSources> {
        let mut sources = AdviceSources::from_catalogs(CatalogSet {
            skincare: Catalog::from_json_str(SKINCARE, "skincare").expect("skincare"),
            hair: Catalog::from_json_str(HAIR, "hair").expect("hair"),
        });
        sources.stress_tips =
            StressTips::from_json_str(r#"{"work": {"lifestyle": ["Take breaks"]}}"#, "tips")
                .expect("tips");
        sources.menstrual = MenstrualGuide::from_json_str(
            r#"{"lifestyle": {"sleep": {"6-7": "Keep a steady bedtime"}},
                "precautions": {"moderate": ["Use a heating pad"]}}"#,
            "menstrual",
        )
        .expect("menstrual");
        sources.pregnancy = PregnancyGuide::from_json_str(
            r#"{"months": {"2": {"lifestyle": ["Rest often"]}}}"#,
            "pregnancy",
        )
        .expect("pregnancy");
        Arc::new(sources)
    }

    fn in_memory_service() -> AdviceService {
        AdviceService::new(sources(), AdviceStores::in_memory())
    }

    fn user() -> UserId {
        UserId("user-1".to_string())
    }

    #[tokio::test]
    async fn recommend_records_analysis_and_resolves_slug() {
        let service = in_memory_service();

        let recommendation = service
            .recommend(&user(), AdviceDomain::Skincare, &UserQuery::new("whiteheads", "male", "oily"))
            .await;

        assert_eq!(recommendation.tier, MatchTier::Exact);
        assert_eq!(recommendation.record.morning_routine, "BHA cleanser");
        assert_eq!(recommendation.issue_slug.as_deref(), Some("blackheads"));
        assert!(recommendation.history_recorded);

        let latest = service.latest_analysis(&user(), "blackheads").await.expect("latest");
        assert_eq!(latest.map(|record| record.catalog_index), Some(1));
    }

    #[tokio::test]
    async fn store_failure_during_recommend_still_returns_advice() {
        let service = AdviceService::new(
            sources(),
            AdviceStores { analysis: Arc::new(OfflineStore), ..AdviceStores::in_memory() },
        );

        let recommendation = service
            .recommend(&user(), AdviceDomain::Skincare, &UserQuery::new("Pimples", "female", "oily"))
            .await;

        assert_eq!(recommendation.catalog_index, 0);
        assert!(!recommendation.history_recorded);
    }

    #[tokio::test]
    async fn store_failure_is_distinct_from_empty_history() {
        let offline = AdviceService::new(
            sources(),
            AdviceStores { feedback: Arc::new(OfflineStore), ..AdviceStores::in_memory() },
        );
        let error = offline.progress(&user(), "Pimples").await.expect_err("store offline");
        assert!(matches!(error, ApplicationError::Persistence(_)));
        assert!(error.is_retryable());

        let empty = in_memory_service().progress(&user(), "Pimples").await.expect("empty history");
        assert!(empty.is_empty());
        assert_eq!(empty.average.value(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn submitted_feedback_is_visible_in_the_returned_history() {
        let service = in_memory_service();

        service
            .submit_feedback(FeedbackRecord::new(
                user(),
                "pimples",
                SatisfactionLevel::Satisfied,
                Some(8),
                true,
            ))
            .await
            .expect("first submission");
        let history = service
            .submit_feedback(FeedbackRecord::new(
                user(),
                "Pimples",
                SatisfactionLevel::VeryDissatisfied,
                None,
                false,
            ))
            .await
            .expect("second submission");

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries[0].record.issue, "Pimples");
        // (8.4 + 1.0) / 2
        assert_eq!(history.average.value(), Decimal::new(47, 1));
    }

    #[tokio::test]
    async fn overview_lists_every_directory_issue() {
        let service = in_memory_service();
        service
            .submit_feedback(FeedbackRecord::new(
                user(),
                "darkspots",
                SatisfactionLevel::Neutral,
                Some(5),
                false,
            ))
            .await
            .expect("submit");

        let overview = service.overview(&user()).await.expect("overview");
        let slugs: Vec<&str> = overview.iter().map(|issue| issue.slug.as_str()).collect();
        assert_eq!(slugs, vec!["blackheads", "pimples", "darkspots"]);
        assert_eq!(overview[0].average.value(), Decimal::ZERO);
        assert_eq!(overview[2].average.value(), Decimal::new(45, 1));
        assert_eq!(overview[2].submissions, 1);
    }

    #[tokio::test]
    async fn engagement_uses_the_hundred_point_scale() {
        let service = in_memory_service();

        let history = service
            .submit_engagement(
                EngagementFeedback::new(user(), " work ", Some(4))
                    .with_tips_used(vec!["Take breaks".to_string()])
                    .with_comments("better"),
            )
            .await
            .expect("submit engagement");

        assert_eq!(history.average.scale(), ProgressScale::Hundred);
        assert_eq!(history.average.value(), Decimal::from(30 + 24 + 10 + 5));
        assert_eq!(
            service.engagement_progress(&user(), "WORK").await.expect("progress").len(),
            1
        );
    }

    #[tokio::test]
    async fn stress_advice_fills_missing_lists() {
        let advice = in_memory_service().stress_advice(StressType::Work);
        assert_eq!(advice.lifestyle, vec!["Take breaks"]);
        assert_eq!(advice.exercise, vec!["No exercise tips available"]);
    }

    #[tokio::test]
    async fn scalp_feedback_is_stored_and_averaged_per_table() {
        let service = in_memory_service();

        service
            .submit_scalp_feedback(
                ScalpFeedback::new(user(), "Dandruff", SatisfactionLevel::Satisfied)
                    .with_flags(true, false, true),
            )
            .await
            .expect("first check-in");
        let history = service
            .submit_scalp_feedback(ScalpFeedback::new(user(), "dandruff", SatisfactionLevel::Neutral))
            .await
            .expect("second check-in");

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries[0].record.topic, "dandruff");
        // (85 + 40) / 2
        assert_eq!(history.average.value(), Decimal::new(625, 1));
        assert!(service.scalp_progress(&user(), "hair loss").await.expect("hairfall").is_empty());
        assert!(matches!(
            service
                .submit_scalp_feedback(ScalpFeedback::new(user(), "acne", SatisfactionLevel::Neutral))
                .await,
            Err(ApplicationError::Domain(DomainError::InvariantViolation(_)))
        ));
    }

    #[tokio::test]
    async fn registered_users_resolve_by_name_or_id() {
        let service = in_memory_service();
        let account = service.register_user("asha", "asha@example.com").await.expect("register");

        assert_eq!(service.resolve_user(" asha ").await.expect("by name"), account);
        assert_eq!(service.resolve_user(&account.id.0).await.expect("by id"), account);
        assert!(matches!(
            service.resolve_user("nobody").await,
            Err(ApplicationError::Domain(DomainError::UnknownUser(handle))) if handle == "nobody"
        ));
        assert!(matches!(
            service.register_user("asha", "other@example.com").await,
            Err(ApplicationError::Domain(DomainError::DuplicateUser(_)))
        ));
    }

    #[tokio::test]
    async fn womens_guidance_comes_from_the_loaded_guides() {
        let service = in_memory_service();

        let menstrual = service.menstrual_advice(&MenstrualProfile {
            age: None,
            cycle_length: String::new(),
            pain_level: PainLevel::Moderate,
            symptoms: Vec::new(),
            exercise_frequency: ExerciseFrequency::Often,
            sleep_hours: 6,
        });
        assert_eq!(menstrual.lifestyle, vec!["Keep a steady bedtime"]);
        assert_eq!(menstrual.precautions, vec!["Use a heating pad"]);

        let profile = |month| PregnancyProfile { month, conditions: Vec::new(), sleep_quality: String::new() };
        assert_eq!(service.pregnancy_advice(&profile(2)).expect("month 2").lifestyle, vec!["Rest often"]);
        assert!(matches!(
            service.pregnancy_advice(&profile(0)),
            Err(ApplicationError::Domain(DomainError::InvariantViolation(_)))
        ));
    }

    #[tokio::test]
    async fn check_ins_build_history_and_trend() {
        let service = in_memory_service();

        service
            .submit_check_in(CycleCheckIn::new(user(), PainLevel::Severe, ExerciseFrequency::Rarely, 5, 4))
            .await
            .expect("first check-in");
        let progress = service
            .submit_check_in(CycleCheckIn::new(user(), PainLevel::Low, ExerciseFrequency::Often, 8, 9))
            .await
            .expect("second check-in");

        assert_eq!(progress.history.len(), 2);
        assert_eq!(progress.history.average.scale(), ProgressScale::TenPoint);
        assert_eq!(progress.history.average.value(), Decimal::new(65, 1));
        assert_eq!(progress.trend.len(), 2);

        let invalid = CycleCheckIn::new(user(), PainLevel::Low, ExerciseFrequency::Often, 8, 11);
        assert!(service.submit_check_in(invalid).await.is_err());
        assert_eq!(service.cycle_progress(&user()).await.expect("progress").history.len(), 2);
    }
}
