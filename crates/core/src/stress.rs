//! Stress-management tips keyed by stress type.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;
use crate::errors::DomainError;

/// Maximum tips shown per list.
pub const TIPS_PER_LIST: usize = 5;

const NO_LIFESTYLE: &str = "No lifestyle tips available";
const NO_HOME_REMEDIES: &str = "No home remedies available";
const NO_EXERCISE: &str = "No exercise tips available";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressType {
    Work,
    Relationship,
    Academic,
}

impl StressType {
    pub const ALL: [StressType; 3] = [Self::Work, Self::Relationship, Self::Academic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Relationship => "relationship",
            Self::Academic => "academic",
        }
    }
}

impl fmt::Display for StressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StressType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = value.trim().to_ascii_lowercase();
        let key = key.strip_suffix(" stress").unwrap_or(&key);
        match key {
            "work" => Ok(Self::Work),
            "relationship" => Ok(Self::Relationship),
            "academic" => Ok(Self::Academic),
            _ => Err(DomainError::UnknownStressType(value.trim().to_string())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
struct TipLists {
    #[serde(default)]
    lifestyle: Option<Vec<String>>,
    #[serde(default)]
    home_remedies: Option<Vec<String>>,
    #[serde(default)]
    exercise: Option<Vec<String>>,
}

/// Tip lists per stress type, as loaded from `stress_tips.json`.
///
/// Unknown top-level keys are kept but never selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StressTips {
    by_type: BTreeMap<String, TipLists>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StressAdvice {
    pub stress_type: StressType,
    pub lifestyle: Vec<String>,
    pub home_remedies: Vec<String>,
    pub exercise: Vec<String>,
}

impl StressTips {
    pub fn from_json_str(raw: &str, source_name: &str) -> Result<Self, CatalogError> {
        let by_type = serde_json::from_str::<BTreeMap<String, TipLists>>(raw).map_err(|error| {
            CatalogError::Parse { source_name: source_name.to_string(), message: error.to_string() }
        })?;
        Ok(Self { by_type })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|error| CatalogError::Read {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
        let tips = Self::from_json_str(&raw, &path.display().to_string())?;

        tracing::info!(
            event_name = "stress_tips.loaded",
            path = %path.display(),
            stress_types = tips.by_type.len(),
            "stress tips loaded"
        );
        Ok(tips)
    }

    pub fn covers(&self, stress_type: StressType) -> bool {
        self.by_type.contains_key(stress_type.as_str())
    }

    /// First five tips of each list in source order. A list missing from the
    /// source yields one placeholder entry; a present but empty list stays
    /// empty.
    pub fn select(&self, stress_type: StressType) -> StressAdvice {
        let lists = self.by_type.get(stress_type.as_str()).cloned().unwrap_or_default();

        StressAdvice {
            stress_type,
            lifestyle: take_tips(lists.lifestyle, NO_LIFESTYLE),
            home_remedies: take_tips(lists.home_remedies, NO_HOME_REMEDIES),
            exercise: take_tips(lists.exercise, NO_EXERCISE),
        }
    }
}

fn take_tips(list: Option<Vec<String>>, fallback: &str) -> Vec<String> {
    match list {
        Some(tips) => tips.into_iter().take(TIPS_PER_LIST).collect(),
        None => vec![fallback.to_string()],
    }
}
