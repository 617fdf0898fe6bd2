use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{load_source, parse_source, ExerciseFrequency, PainLevel, ProductLink};
use crate::catalog::CatalogError;
use crate::domain::query::{label_key, normalize_label};

const NO_SLEEP_ADVICE: &str = "No sleep advice available";

/// Nightly sleep bucket used to pick the sleep advice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SleepBand {
    #[serde(rename = "0-5")]
    Short,
    #[serde(rename = "6-7")]
    Moderate,
    #[serde(rename = "8-10")]
    Long,
}

impl SleepBand {
    pub fn for_hours(hours: u32) -> Self {
        match hours {
            0..=5 => Self::Short,
            6..=7 => Self::Moderate,
            _ => Self::Long,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
struct Lifestyle {
    #[serde(default)]
    sleep: BTreeMap<SleepBand, String>,
    #[serde(default)]
    diet: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct GuideSource {
    #[serde(default)]
    lifestyle: Lifestyle,
    #[serde(default)]
    precautions: BTreeMap<PainLevel, Vec<String>>,
    #[serde(default)]
    exercise: BTreeMap<ExerciseFrequency, Vec<String>>,
    #[serde(default)]
    products: BTreeMap<String, Vec<ProductLink>>,
}

/// What a user reports on the menstrual form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenstrualProfile {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub cycle_length: String,
    pub pain_level: PainLevel,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub exercise_frequency: ExerciseFrequency,
    pub sleep_hours: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenstrualAdvice {
    pub sleep_band: SleepBand,
    /// Sleep advice first, then diet tips for each symptom in input order.
    pub lifestyle: Vec<String>,
    pub precautions: Vec<String>,
    pub exercises: Vec<String>,
    pub products: Vec<ProductLink>,
}

/// Menstrual guidance keyed by sleep band, symptom, pain level and exercise
/// frequency, loaded from `menstrual_guide.json`.
#[derive(Clone, Debug, Default)]
pub struct MenstrualGuide {
    sleep: BTreeMap<SleepBand, String>,
    diet: BTreeMap<String, Vec<String>>,
    precautions: BTreeMap<PainLevel, Vec<String>>,
    exercise: BTreeMap<ExerciseFrequency, Vec<String>>,
    products: BTreeMap<String, Vec<ProductLink>>,
}

impl MenstrualGuide {
    pub fn from_json_str(raw: &str, source_name: &str) -> Result<Self, CatalogError> {
        let source: GuideSource = parse_source(raw, source_name)?;
        Ok(Self::from_source(source))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let source: GuideSource = load_source(path, "menstrual_guide.loaded")?;
        Ok(Self::from_source(source))
    }

    fn from_source(source: GuideSource) -> Self {
        Self {
            sleep: source.lifestyle.sleep,
            diet: keyed_by_symptom(source.lifestyle.diet),
            precautions: source.precautions,
            exercise: source.exercise,
            products: keyed_by_symptom(source.products),
        }
    }

    /// Every symptom with diet tips or products, title-cased and sorted.
    pub fn symptoms(&self) -> Vec<String> {
        let known: BTreeSet<String> =
            self.diet.keys().chain(self.products.keys()).map(|key| normalize_label(key)).collect();
        known.into_iter().collect()
    }

    /// Repeated symptoms count once; symptoms the guide does not know add
    /// nothing.
    pub fn advise(&self, profile: &MenstrualProfile) -> MenstrualAdvice {
        let sleep_band = SleepBand::for_hours(profile.sleep_hours);
        let sleep_advice =
            self.sleep.get(&sleep_band).cloned().unwrap_or_else(|| NO_SLEEP_ADVICE.to_string());

        let mut symptoms: Vec<String> = Vec::new();
        for symptom in &profile.symptoms {
            let key = label_key(symptom);
            if !key.is_empty() && !symptoms.contains(&key) {
                symptoms.push(key);
            }
        }

        let mut lifestyle = vec![sleep_advice];
        let mut products = Vec::new();
        for key in &symptoms {
            lifestyle.extend(self.diet.get(key).into_iter().flatten().cloned());
            products.extend(self.products.get(key).into_iter().flatten().cloned());
        }

        MenstrualAdvice {
            sleep_band,
            lifestyle,
            precautions: self.precautions.get(&profile.pain_level).cloned().unwrap_or_default(),
            exercises: self.exercise.get(&profile.exercise_frequency).cloned().unwrap_or_default(),
            products,
        }
    }
}

fn keyed_by_symptom<T>(entries: BTreeMap<String, T>) -> BTreeMap<String, T> {
    entries.into_iter().map(|(symptom, value)| (label_key(&symptom), value)).collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{MenstrualGuide, MenstrualProfile, SleepBand};
    use crate::womens::{ExerciseFrequency, PainLevel};

    const SAMPLE: &str = r#"{
        "lifestyle": {
            "sleep": {"0-5": "Aim for more rest", "6-7": "Keep a steady bedtime", "8-10": "Good sleep"},
            "diet": {"Cramps": ["Magnesium-rich foods", "Ginger tea"], "bloating": ["Cut salty snacks"]}
        },
        "precautions": {"severe": ["See a gynecologist"], "low": ["Track your cycle"]},
        "exercise": {"never": ["Start with short walks"]},
        "products": {"cramps": [{"name": "Heating pad", "link": "https://example.com/pad"}]}
    }"#;

    fn profile(sleep_hours: u32, symptoms: &[&str]) -> MenstrualProfile {
        MenstrualProfile {
            age: Some(24),
            cycle_length: "28 days".to_string(),
            pain_level: PainLevel::Severe,
            symptoms: symptoms.iter().map(|symptom| symptom.to_string()).collect(),
            exercise_frequency: ExerciseFrequency::Never,
            sleep_hours,
        }
    }

    #[test]
    fn sleep_bands_follow_hour_boundaries() {
        assert_eq!(SleepBand::for_hours(0), SleepBand::Short);
        assert_eq!(SleepBand::for_hours(5), SleepBand::Short);
        assert_eq!(SleepBand::for_hours(6), SleepBand::Moderate);
        assert_eq!(SleepBand::for_hours(7), SleepBand::Moderate);
        assert_eq!(SleepBand::for_hours(8), SleepBand::Long);
        assert_eq!(SleepBand::for_hours(12), SleepBand::Long);
    }

    #[test]
    fn advice_combines_sleep_symptoms_pain_and_exercise() {
        let guide = MenstrualGuide::from_json_str(SAMPLE, "inline").expect("guide");
        let advice = guide.advise(&profile(5, &["cramps", "Bloating", "CRAMPS", "Acne"]));

        assert_eq!(
            advice.lifestyle,
            vec!["Aim for more rest", "Magnesium-rich foods", "Ginger tea", "Cut salty snacks"]
        );
        assert_eq!(advice.precautions, vec!["See a gynecologist"]);
        assert_eq!(advice.exercises, vec!["Start with short walks"]);
        assert_eq!(advice.products.len(), 1);
        assert_eq!(advice.products[0].name, "Heating pad");
        assert_eq!(advice, guide.advise(&profile(5, &["cramps", "Bloating", "CRAMPS", "Acne"])));
    }

    #[test]
    fn missing_entries_leave_lists_empty() {
        let guide = MenstrualGuide::from_json_str(r#"{"precautions": {}}"#, "inline").expect("guide");
        let advice = guide.advise(&profile(9, &[]));

        assert_eq!(advice.lifestyle, vec!["No sleep advice available"]);
        assert!(advice.precautions.is_empty());
        assert!(advice.exercises.is_empty());
        assert!(advice.products.is_empty());
    }

    #[test]
    fn bundled_guide_covers_every_pain_level_and_frequency() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/menstrual_guide.json");
        let guide = MenstrualGuide::load(Path::new(path)).expect("bundled guide");

        for pain_level in [PainLevel::Low, PainLevel::Moderate, PainLevel::Severe] {
            let mut sample = profile(7, &["Cramps"]);
            sample.pain_level = pain_level;
            assert!(!guide.advise(&sample).precautions.is_empty(), "{pain_level} precautions");
        }
        assert!(guide.symptoms().contains(&"Cramps".to_string()));
    }

    #[test]
    fn malformed_guide_is_rejected() {
        assert!(MenstrualGuide::from_json_str(r#"{"precautions": {"unbearable": []}}"#, "inline")
            .is_err());
    }
}
