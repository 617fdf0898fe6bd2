pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod service;

pub use connection::{connect, connect_with_settings, DbPool};
pub use repositories::{
    AnalysisRepository, CycleCheckInRepository, EngagementRepository, FeedbackRepository,
    RepositoryError, ScalpFeedbackRepository, SqlAnalysisRepository, SqlCycleCheckInRepository,
    SqlEngagementRepository, SqlFeedbackRepository, SqlScalpFeedbackRepository,
    SqlUserRepository, UserRepository,
};
pub use service::{AdviceService, AdviceStores, CycleProgress, Recommendation};
