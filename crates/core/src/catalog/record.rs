use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::query::LifestyleFactors;

/// One routine entry of an advice catalog.
///
/// Field names accept both snake_case and the column names used by the
/// published skincare and hair datasets (`SkinIssue`, `SkinType`,
/// `MorningRoutine`, `AmazonProducts`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(alias = "SkinIssue", alias = "Issue")]
    pub issue: String,
    #[serde(alias = "Gender")]
    pub gender: String,
    #[serde(
        alias = "SkinType",
        alias = "Scalp_Type",
        alias = "skin_type",
        alias = "scalp_type"
    )]
    pub skin_or_scalp_type: String,
    #[serde(default, alias = "MorningRoutine", alias = "Routine")]
    pub morning_routine: String,
    #[serde(default, alias = "NightRoutine")]
    pub night_routine: String,
    #[serde(default, alias = "Remedies", deserialize_with = "deserialize_remedies")]
    pub remedies: Vec<String>,
    #[serde(default, alias = "AmazonProducts", deserialize_with = "deserialize_products")]
    pub linked_products: BTreeMap<String, String>,
    #[serde(default, alias = "Age", skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, alias = "Sleep_Hours", skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<u32>,
    #[serde(flatten)]
    pub factors: LifestyleFactors,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RemediesSource {
    Text(String),
    List(Vec<String>),
}

/// Remedies arrive either as a list or as one `;`-separated string.
fn deserialize_remedies<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let source = Option::<RemediesSource>::deserialize(deserializer)?;
    let entries = match source {
        None => Vec::new(),
        Some(RemediesSource::Text(text)) => split_remedies(&text),
        Some(RemediesSource::List(list)) => list
            .into_iter()
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect(),
    };
    Ok(entries)
}

fn deserialize_products<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn split_remedies(text: &str) -> Vec<String> {
    text.split(';').map(str::trim).filter(|entry| !entry.is_empty()).map(str::to_string).collect()
}
