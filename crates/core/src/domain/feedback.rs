use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::query::normalize_label;
use crate::domain::user::UserId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedbackId(pub String);

impl FeedbackId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// How satisfied a user reported being with a routine.
///
/// Parsing is total: anything outside the five known tiers is kept verbatim
/// as [`SatisfactionLevel::Unrecognized`] and scores as the lowest value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SatisfactionLevel {
    VeryDissatisfied,
    Dissatisfied,
    Neutral,
    Satisfied,
    VerySatisfied,
    Unrecognized(String),
}

impl SatisfactionLevel {
    pub const KNOWN: [SatisfactionLevel; 5] = [
        SatisfactionLevel::VeryDissatisfied,
        SatisfactionLevel::Dissatisfied,
        SatisfactionLevel::Neutral,
        SatisfactionLevel::Satisfied,
        SatisfactionLevel::VerySatisfied,
    ];

    pub fn parse(value: &str) -> Self {
        match normalize_label(value).as_str() {
            "Very Dissatisfied" => Self::VeryDissatisfied,
            "Dissatisfied" => Self::Dissatisfied,
            "Neutral" => Self::Neutral,
            "Satisfied" => Self::Satisfied,
            "Very Satisfied" => Self::VerySatisfied,
            _ => Self::Unrecognized(value.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::VeryDissatisfied => "Very Dissatisfied",
            Self::Dissatisfied => "Dissatisfied",
            Self::Neutral => "Neutral",
            Self::Satisfied => "Satisfied",
            Self::VerySatisfied => "Very Satisfied",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for SatisfactionLevel {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SatisfactionLevel> for String {
    fn from(value: SatisfactionLevel) -> Self {
        value.label().to_string()
    }
}

/// Self-reported adherence to the routine that was shown. Stored alongside
/// feedback for display; not part of any score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineAdherence {
    pub followed_morning_routine: bool,
    pub followed_night_routine: bool,
    pub products_made_change: bool,
    pub remedies_helpful: bool,
}

/// One feedback submission for a (user, issue) pair. Append-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: FeedbackId,
    pub user_id: UserId,
    pub issue: String,
    pub satisfaction_level: SatisfactionLevel,
    pub effectiveness_rating: Option<i32>,
    pub problem_solved: bool,
    pub adherence: RoutineAdherence,
    pub suggestions: String,
    pub submitted_at: DateTime<Utc>,
}

impl FeedbackRecord {
    pub fn new(
        user_id: UserId,
        issue: impl Into<String>,
        satisfaction_level: SatisfactionLevel,
        effectiveness_rating: Option<i32>,
        problem_solved: bool,
    ) -> Self {
        Self {
            id: FeedbackId::generate(),
            user_id,
            issue: issue.into(),
            satisfaction_level,
            effectiveness_rating,
            problem_solved,
            adherence: RoutineAdherence::default(),
            suggestions: String::new(),
            submitted_at: Utc::now(),
        }
    }

    pub fn with_adherence(mut self, adherence: RoutineAdherence) -> Self {
        self.adherence = adherence;
        self
    }

    pub fn with_suggestions(mut self, suggestions: impl Into<String>) -> Self {
        self.suggestions = suggestions.into();
        self
    }

    pub fn submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }
}

/// Rating, tips and comments collected by the hair and stress modules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementFeedback {
    pub id: FeedbackId,
    pub user_id: UserId,
    pub topic: String,
    pub rating: Option<i32>,
    pub tips_used: Vec<String>,
    pub comments: String,
    pub submitted_at: DateTime<Utc>,
}

impl EngagementFeedback {
    pub fn new(user_id: UserId, topic: impl Into<String>, rating: Option<i32>) -> Self {
        Self {
            id: FeedbackId::generate(),
            user_id,
            topic: topic.into(),
            rating,
            tips_used: Vec::new(),
            comments: String::new(),
            submitted_at: Utc::now(),
        }
    }

    pub fn with_tips_used(mut self, tips_used: Vec<String>) -> Self {
        self.tips_used = tips_used;
        self
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    pub fn submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }
}

/// Scalp-care questionnaire behind the improvement percentage. Append-only.
///
/// `topic` names the improvement table (`hairfall` or `dandruff`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalpFeedback {
    pub id: FeedbackId,
    pub user_id: UserId,
    pub topic: String,
    pub satisfaction_level: SatisfactionLevel,
    pub followed_routine: bool,
    pub product_helpful: bool,
    pub remedies_helpful: bool,
    #[serde(default)]
    pub comments: String,
    pub submitted_at: DateTime<Utc>,
}

impl ScalpFeedback {
    pub fn new(
        user_id: UserId,
        topic: impl Into<String>,
        satisfaction_level: SatisfactionLevel,
    ) -> Self {
        Self {
            id: FeedbackId::generate(),
            user_id,
            topic: topic.into(),
            satisfaction_level,
            followed_routine: false,
            product_helpful: false,
            remedies_helpful: false,
            comments: String::new(),
            submitted_at: Utc::now(),
        }
    }

    pub fn with_flags(
        mut self,
        followed_routine: bool,
        product_helpful: bool,
        remedies_helpful: bool,
    ) -> Self {
        self.followed_routine = followed_routine;
        self.product_helpful = product_helpful;
        self.remedies_helpful = remedies_helpful;
        self
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    pub fn submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }
}
