use serde::{Deserialize, Serialize};

/// Attributes a user supplies when asking for a routine.
///
/// Categorical fields are free text from the caller; call [`UserQuery::normalized`]
/// (the matcher does) so that case and whitespace never change the outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuery {
    pub issue: String,
    pub gender: String,
    pub skin_or_scalp_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<u32>,
    #[serde(flatten)]
    pub factors: LifestyleFactors,
}

/// Optional categorical answers from the analysis forms.
///
/// Catalog rows carry the same columns (`Water_Intake`, `Oil_Scalp`,
/// `Chem_Treatments`, `Makeup`). A factor only takes part in matching when
/// the query supplies it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifestyleFactors {
    #[serde(default, alias = "Water_Intake", skip_serializing_if = "Option::is_none")]
    pub water_intake: Option<String>,
    #[serde(default, alias = "Oil_Scalp", skip_serializing_if = "Option::is_none")]
    pub oily_scalp: Option<String>,
    #[serde(
        default,
        alias = "Chem_Treatments",
        alias = "Chemical_Treatment",
        skip_serializing_if = "Option::is_none"
    )]
    pub chemical_treatment: Option<String>,
    #[serde(default, alias = "Makeup", skip_serializing_if = "Option::is_none")]
    pub makeup: Option<String>,
}

impl LifestyleFactors {
    pub const COUNT: usize = 4;

    /// Values in a fixed column order: water intake, oily scalp, chemical
    /// treatment, makeup.
    pub fn values(&self) -> [Option<&str>; Self::COUNT] {
        [
            self.water_intake.as_deref(),
            self.oily_scalp.as_deref(),
            self.chemical_treatment.as_deref(),
            self.makeup.as_deref(),
        ]
    }

    pub fn normalized(&self) -> Self {
        let clean = |value: &Option<String>| {
            value.as_deref().map(normalize_label).filter(|value| !value.is_empty())
        };
        Self {
            water_intake: clean(&self.water_intake),
            oily_scalp: clean(&self.oily_scalp),
            chemical_treatment: clean(&self.chemical_treatment),
            makeup: clean(&self.makeup),
        }
    }
}

impl UserQuery {
    pub fn new(
        issue: impl Into<String>,
        gender: impl Into<String>,
        skin_or_scalp_type: impl Into<String>,
    ) -> Self {
        Self {
            issue: issue.into(),
            gender: gender.into(),
            skin_or_scalp_type: skin_or_scalp_type.into(),
            age: None,
            sleep_hours: None,
            factors: LifestyleFactors::default(),
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_sleep_hours(mut self, sleep_hours: u32) -> Self {
        self.sleep_hours = Some(sleep_hours);
        self
    }

    pub fn with_factors(mut self, factors: LifestyleFactors) -> Self {
        self.factors = factors;
        self
    }

    pub fn normalized(&self) -> Self {
        Self {
            issue: normalize_label(&self.issue),
            gender: normalize_label(&self.gender),
            skin_or_scalp_type: normalize_label(&self.skin_or_scalp_type),
            age: self.age,
            sleep_hours: self.sleep_hours,
            factors: self.factors.normalized(),
        }
    }
}

/// Trims, collapses inner whitespace and title-cases a categorical label.
///
/// Every letter that follows a non-letter is upper-cased, the rest are
/// lower-cased: `"  black/white   HEADS "` becomes `"Black/White Heads"`.
pub fn normalize_label(value: &str) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut output = String::with_capacity(collapsed.len());
    let mut previous_is_letter = false;

    for ch in collapsed.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                output.extend(ch.to_lowercase());
            } else {
                output.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            output.push(ch);
            previous_is_letter = false;
        }
    }

    output
}

/// Case-folded key used for equality comparisons between labels.
pub(crate) fn label_key(value: &str) -> String {
    normalize_label(value).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{label_key, normalize_label, LifestyleFactors, UserQuery};

    #[test]
    fn normalize_label_title_cases_and_trims() {
        assert_eq!(normalize_label("  oily "), "Oily");
        assert_eq!(normalize_label("FEMALE"), "Female");
        assert_eq!(normalize_label("black/white   heads"), "Black/White Heads");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn label_key_ignores_case_and_spacing() {
        assert_eq!(label_key("Dark  Circles"), label_key(" dark circles"));
    }

    #[test]
    fn normalized_query_keeps_numeric_attributes() {
        let query =
            UserQuery::new(" pimples", "female ", "OILY").with_age(24).with_sleep_hours(6);
        let normalized = query.normalized();

        assert_eq!(normalized.issue, "Pimples");
        assert_eq!(normalized.gender, "Female");
        assert_eq!(normalized.skin_or_scalp_type, "Oily");
        assert_eq!(normalized.age, Some(24));
        assert_eq!(normalized.sleep_hours, Some(6));
    }

    #[test]
    fn factors_accept_form_column_names_and_drop_blanks() {
        let query: UserQuery = serde_json::from_str(
            r#"{
                "issue": "Hairfall",
                "gender": "Male",
                "skin_or_scalp_type": "Oily",
                "Water_Intake": " low",
                "Chem_Treatments": "YES",
                "Makeup": "  "
            }"#,
        )
        .expect("query should parse");
        let normalized = query.normalized();

        assert_eq!(normalized.factors.water_intake.as_deref(), Some("Low"));
        assert_eq!(normalized.factors.chemical_treatment.as_deref(), Some("Yes"));
        assert_eq!(normalized.factors.makeup, None);
        assert_eq!(
            normalized.factors.values(),
            [Some("Low"), None, Some("Yes"), None]
        );
        assert_eq!(LifestyleFactors::default().values(), [None; LifestyleFactors::COUNT]);
    }
}
