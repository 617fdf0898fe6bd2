use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{load_source, parse_source};
use crate::catalog::CatalogError;
use crate::domain::query::{label_key, normalize_label};
use crate::errors::DomainError;

pub const TIPS_PER_LIST: usize = 4;
pub const EXERCISES_SHOWN: usize = 3;
pub const MONTHS: std::ops::RangeInclusive<u8> = 1..=9;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PregnancyExercise {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct MonthGuide {
    #[serde(default)]
    lifestyle: Vec<String>,
    #[serde(default)]
    diet: Vec<String>,
    #[serde(default)]
    precautions: Vec<String>,
    #[serde(default)]
    exercise: Vec<PregnancyExercise>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct ConditionGuide {
    #[serde(default)]
    diet: Vec<String>,
    #[serde(default)]
    precautions: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct GuideSource {
    #[serde(default)]
    months: BTreeMap<u8, MonthGuide>,
    #[serde(default)]
    conditions: BTreeMap<String, ConditionGuide>,
    #[serde(default)]
    sleep: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PregnancyProfile {
    pub month: u8,
    #[serde(default)]
    pub conditions: Vec<String>,
    /// `good`, `average` or `poor` in the bundled guide.
    #[serde(default)]
    pub sleep_quality: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConditionAdvice {
    pub condition: String,
    pub diet: Vec<String>,
    pub precautions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PregnancyAdvice {
    pub month: u8,
    pub lifestyle: Vec<String>,
    pub diet: Vec<String>,
    pub precautions: Vec<String>,
    pub exercises: Vec<PregnancyExercise>,
    pub conditions: Vec<ConditionAdvice>,
    pub sleep: Vec<String>,
}

/// Month-by-month pregnancy guidance plus per-condition and sleep tips,
/// loaded from `pregnancy_guide.json`.
#[derive(Clone, Debug, Default)]
pub struct PregnancyGuide {
    months: BTreeMap<u8, MonthGuide>,
    /// Keyed by case-folded condition; the value keeps the display name.
    conditions: BTreeMap<String, (String, ConditionGuide)>,
    sleep: BTreeMap<String, Vec<String>>,
}

impl PregnancyGuide {
    pub fn from_json_str(raw: &str, source_name: &str) -> Result<Self, CatalogError> {
        let source: GuideSource = parse_source(raw, source_name)?;
        Ok(Self::from_source(source))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let source: GuideSource = load_source(path, "pregnancy_guide.loaded")?;
        Ok(Self::from_source(source))
    }

    fn from_source(source: GuideSource) -> Self {
        Self {
            months: source.months,
            conditions: source
                .conditions
                .into_iter()
                .map(|(name, guide)| (label_key(&name), (normalize_label(&name), guide)))
                .collect(),
            sleep: source.sleep.into_iter().map(|(quality, tips)| (label_key(&quality), tips)).collect(),
        }
    }

    pub fn covers_month(&self, month: u8) -> bool {
        self.months.contains_key(&month)
    }

    /// The first four lifestyle, diet and precaution tips and the first three
    /// exercises for the month, in source order. Unknown conditions are
    /// skipped.
    pub fn advise(&self, profile: &PregnancyProfile) -> Result<PregnancyAdvice, DomainError> {
        if !MONTHS.contains(&profile.month) {
            return Err(DomainError::InvariantViolation(format!(
                "pregnancy month {} is outside 1..=9",
                profile.month
            )));
        }

        let month = self.months.get(&profile.month).cloned().unwrap_or_default();

        let mut seen = Vec::new();
        let mut conditions = Vec::new();
        for requested in &profile.conditions {
            let key = label_key(requested);
            if seen.contains(&key) {
                continue;
            }
            if let Some((name, guide)) = self.conditions.get(&key) {
                conditions.push(ConditionAdvice {
                    condition: name.clone(),
                    diet: guide.diet.clone(),
                    precautions: guide.precautions.clone(),
                });
            }
            seen.push(key);
        }

        Ok(PregnancyAdvice {
            month: profile.month,
            lifestyle: month.lifestyle.into_iter().take(TIPS_PER_LIST).collect(),
            diet: month.diet.into_iter().take(TIPS_PER_LIST).collect(),
            precautions: month.precautions.into_iter().take(TIPS_PER_LIST).collect(),
            exercises: month.exercise.into_iter().take(EXERCISES_SHOWN).collect(),
            conditions,
            sleep: self.sleep.get(&label_key(&profile.sleep_quality)).cloned().unwrap_or_default(),
        })
    }
}
