use serde::Serialize;

use crate::catalog::record::CatalogRecord;
use crate::domain::query::{normalize_label, LifestyleFactors, UserQuery};

/// Sorted vocabulary for one categorical column. A label's code is its
/// position in the sorted class list, so codes are stable across runs for
/// the same catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LabelMap {
    classes: Vec<String>,
}

impl LabelMap {
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut classes: Vec<String> = values.into_iter().map(normalize_label).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn encode(&self, value: &str) -> Option<usize> {
        self.classes.binary_search(&normalize_label(value)).ok()
    }

    /// Unseen values take the first class.
    pub fn encode_or_first(&self, value: &str) -> usize {
        self.encode(value).unwrap_or(0)
    }
}

/// Label maps for every categorical column, fitted once over a whole catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LabelEncoding {
    pub gender: LabelMap,
    pub issue: LabelMap,
    pub skin_or_scalp_type: LabelMap,
    /// One map per [`LifestyleFactors`] column, in `values()` order.
    pub factors: [LabelMap; LifestyleFactors::COUNT],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EncodedRow {
    pub gender: usize,
    pub issue: usize,
    pub skin_or_scalp_type: usize,
    pub age: Option<u32>,
    pub sleep_hours: Option<u32>,
    pub factors: [Option<usize>; LifestyleFactors::COUNT],
}

impl LabelEncoding {
    pub fn fit(records: &[CatalogRecord]) -> Self {
        Self {
            gender: LabelMap::fit(records.iter().map(|record| record.gender.as_str())),
            issue: LabelMap::fit(records.iter().map(|record| record.issue.as_str())),
            skin_or_scalp_type: LabelMap::fit(
                records.iter().map(|record| record.skin_or_scalp_type.as_str()),
            ),
            factors: std::array::from_fn(|column| {
                LabelMap::fit(records.iter().filter_map(|record| record.factors.values()[column]))
            }),
        }
    }

    fn encode_factors(&self, factors: &LifestyleFactors) -> [Option<usize>; LifestyleFactors::COUNT] {
        let values = factors.values();
        std::array::from_fn(|column| {
            values[column].map(|value| self.factors[column].encode_or_first(value))
        })
    }

    pub(crate) fn encode_record(&self, record: &CatalogRecord) -> EncodedRow {
        EncodedRow {
            gender: self.gender.encode_or_first(&record.gender),
            issue: self.issue.encode_or_first(&record.issue),
            skin_or_scalp_type: self.skin_or_scalp_type.encode_or_first(&record.skin_or_scalp_type),
            age: record.age,
            sleep_hours: record.sleep_hours,
            factors: self.encode_factors(&record.factors),
        }
    }

    /// Encodes a query against the catalog vocabulary; any categorical value
    /// the catalog has never seen falls back to that column's first class.
    pub(crate) fn encode_query(&self, query: &UserQuery) -> EncodedRow {
        EncodedRow {
            gender: self.gender.encode_or_first(&query.gender),
            issue: self.issue.encode_or_first(&query.issue),
            skin_or_scalp_type: self.skin_or_scalp_type.encode_or_first(&query.skin_or_scalp_type),
            age: query.age,
            sleep_hours: query.sleep_hours,
            factors: self.encode_factors(&query.factors),
        }
    }
}

impl EncodedRow {
    /// Squared Euclidean distance from `self` (a query) to a catalog row.
    /// Numeric dimensions and lifestyle factors only count when the query
    /// supplies them. A row missing a numeric value reads as zero; a row
    /// missing a factor costs one.
    pub(crate) fn squared_distance_to(&self, row: &EncodedRow) -> f64 {
        let categorical = [
            (self.gender, row.gender),
            (self.issue, row.issue),
            (self.skin_or_scalp_type, row.skin_or_scalp_type),
        ];
        let mut total: f64 = categorical
            .iter()
            .map(|(left, right)| {
                let delta = *left as f64 - *right as f64;
                delta * delta
            })
            .sum();

        for (query_value, row_value) in
            [(self.age, row.age), (self.sleep_hours, row.sleep_hours)]
        {
            if let Some(query_value) = query_value {
                let delta = f64::from(query_value) - f64::from(row_value.unwrap_or(0));
                total += delta * delta;
            }
        }

        for (query_code, row_code) in self.factors.iter().zip(row.factors.iter()) {
            total += match (query_code, row_code) {
                (Some(left), Some(right)) => {
                    let delta = *left as f64 - *right as f64;
                    delta * delta
                }
                (Some(_), None) => 1.0,
                (None, _) => 0.0,
            };
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::{LabelEncoding, LabelMap};
    use crate::catalog::CatalogRecord;
    use crate::domain::query::{LifestyleFactors, UserQuery};

    #[test]
    fn label_map_sorts_and_dedups_normalized_values() {
        let map = LabelMap::fit(["oily", "Dry", "OILY", "combination"]);
        assert_eq!(map.classes(), &["Combination".to_string(), "Dry".into(), "Oily".into()]);
        assert_eq!(map.encode(" oily"), Some(2));
        assert_eq!(map.encode("sensitive"), None);
        assert_eq!(map.encode_or_first("sensitive"), 0);
    }

    fn hair_record(water: Option<&str>) -> CatalogRecord {
        CatalogRecord {
            issue: "Hairfall".to_string(),
            gender: "Male".to_string(),
            skin_or_scalp_type: "Oily".to_string(),
            morning_routine: String::new(),
            night_routine: String::new(),
            remedies: Vec::new(),
            linked_products: Default::default(),
            age: None,
            sleep_hours: None,
            factors: LifestyleFactors {
                water_intake: water.map(str::to_string),
                ..LifestyleFactors::default()
            },
        }
    }

    #[test]
    fn factors_count_only_when_the_query_supplies_them() {
        let records = vec![hair_record(Some("High")), hair_record(Some("Low")), hair_record(None)];
        let encoding = LabelEncoding::fit(&records);
        assert_eq!(encoding.factors[0].classes(), &["High".to_string(), "Low".into()]);

        let rows: Vec<_> = records.iter().map(|record| encoding.encode_record(record)).collect();

        let plain = encoding.encode_query(&UserQuery::new("Hairfall", "Male", "Oily"));
        assert!(rows.iter().all(|row| plain.squared_distance_to(row) == 0.0));

        let low = encoding.encode_query(&UserQuery::new("Hairfall", "Male", "Oily").with_factors(
            LifestyleFactors { water_intake: Some("Low".to_string()), ..LifestyleFactors::default() },
        ));
        assert_eq!(low.squared_distance_to(&rows[0]), 1.0);
        assert_eq!(low.squared_distance_to(&rows[1]), 0.0);
        assert_eq!(low.squared_distance_to(&rows[2]), 1.0);
    }
}
