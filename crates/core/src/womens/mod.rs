//! Menstrual and pregnancy guidance plus the cycle check-in trend.
//!
//! Both guides are static JSON sources loaded once, like the stress tips.
//! Selection is deterministic: the same profile always yields the same
//! advice in source order.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;
use crate::domain::checkin::CycleCheckIn;
use crate::errors::DomainError;

pub mod menstrual;
pub mod pregnancy;

pub use menstrual::{MenstrualAdvice, MenstrualGuide, MenstrualProfile, SleepBand};
pub use pregnancy::{ConditionAdvice, PregnancyAdvice, PregnancyGuide, PregnancyProfile};

/// Self-reported period pain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PainLevel {
    Low,
    Moderate,
    Severe,
}

impl PainLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }

    /// Position on the 0-10 trend chart.
    pub fn chart_points(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Moderate => 5,
            Self::Severe => 10,
        }
    }
}

impl fmt::Display for PainLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PainLevel {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" | "mild" => Ok(Self::Low),
            "moderate" | "medium" => Ok(Self::Moderate),
            "severe" | "high" => Ok(Self::Severe),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown pain level `{other}` (expected low|moderate|severe)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseFrequency {
    Never,
    Rarely,
    Occasionally,
    Often,
    Regularly,
}

impl ExerciseFrequency {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Never => "Never",
            Self::Rarely => "Rarely",
            Self::Occasionally => "Occasionally",
            Self::Often => "Often",
            Self::Regularly => "Regularly",
        }
    }

    pub fn chart_points(&self) -> u8 {
        match self {
            Self::Never => 0,
            Self::Rarely => 2,
            Self::Occasionally => 5,
            Self::Often => 8,
            Self::Regularly => 10,
        }
    }
}

impl fmt::Display for ExerciseFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExerciseFrequency {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "never" => Ok(Self::Never),
            "rarely" => Ok(Self::Rarely),
            "occasionally" => Ok(Self::Occasionally),
            "often" => Ok(Self::Often),
            "regularly" | "daily" => Ok(Self::Regularly),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown exercise frequency `{other}` (expected never|rarely|occasionally|often|regularly)"
            ))),
        }
    }
}

/// Product suggestion with a shopping link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLink {
    pub name: String,
    #[serde(default)]
    pub link: String,
}

/// Chart series over a user's cycle check-ins, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CycleTrend {
    pub dates: Vec<String>,
    pub sleep: Vec<u32>,
    pub pain: Vec<u8>,
    pub score: Vec<u8>,
    pub exercise: Vec<u8>,
}

impl CycleTrend {
    /// Accepts check-ins in any order; equal timestamps keep input order.
    pub fn from_check_ins(check_ins: &[CycleCheckIn]) -> Self {
        let mut ordered: Vec<&CycleCheckIn> = check_ins.iter().collect();
        ordered.sort_by_key(|check_in| check_in.submitted_at);

        let mut trend = Self::default();
        for check_in in ordered {
            trend.dates.push(check_in.submitted_at.format("%Y-%m-%d").to_string());
            trend.sleep.push(check_in.sleep_hours);
            trend.pain.push(check_in.pain_level.chart_points());
            trend.score.push(check_in.overall_score);
            trend.exercise.push(check_in.exercise_frequency.chart_points());
        }
        trend
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

fn load_source<T: DeserializeOwned>(path: &Path, event_name: &'static str) -> Result<T, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|error| CatalogError::Read {
        path: path.display().to_string(),
        message: error.to_string(),
    })?;
    let parsed = parse_source(&raw, &path.display().to_string())?;

    tracing::info!(event_name, path = %path.display(), "guidance source loaded");
    Ok(parsed)
}

fn parse_source<T: DeserializeOwned>(raw: &str, source_name: &str) -> Result<T, CatalogError> {
    serde_json::from_str(raw).map_err(|error| CatalogError::Parse {
        source_name: source_name.to_string(),
        message: error.to_string(),
    })
}
