pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod issues;
pub mod matching;
pub mod progress;
pub mod sources;
pub mod stress;
pub mod womens;

pub use catalog::{AdviceDomain, Catalog, CatalogError, CatalogRecord, CatalogSet};
pub use domain::analysis::{AnalysisId, AnalysisRecord};
pub use domain::checkin::CycleCheckIn;
pub use domain::feedback::{
    EngagementFeedback, FeedbackId, FeedbackRecord, RoutineAdherence, SatisfactionLevel,
    ScalpFeedback,
};
pub use domain::query::{LifestyleFactors, UserQuery};
pub use domain::user::{UserAccount, UserId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use issues::{IssueDirectory, IssueEntry};
pub use matching::{MatchOutcome, MatchTier, Matcher};
pub use progress::{
    aggregate, CycleScorer, HundredPointScorer, ImprovementScorer, ImprovementTable, IssueProgress,
    ProgressHistory, ProgressScale, ProgressScorer, ProgressValue, ProgressWeights, ScoredEntry,
    TenPointScorer,
};
pub use sources::AdviceSources;
pub use stress::{StressAdvice, StressTips, StressType};
pub use womens::{
    CycleTrend, ExerciseFrequency, MenstrualAdvice, MenstrualGuide, MenstrualProfile, PainLevel,
    PregnancyAdvice, PregnancyGuide, PregnancyProfile,
};
