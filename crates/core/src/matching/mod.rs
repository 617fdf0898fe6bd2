//! Routine selection: exact match, then synonym relaxation, then a
//! nearest-neighbor fallback over the catalog's label encoding.
//!
//! Resolution is total. A constructed [`Catalog`] is never empty, so every
//! query resolves to exactly one record, and the same catalog and query always
//! resolve to the same record.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogRecord};
use crate::domain::query::{label_key, UserQuery};
use crate::issues::IssueDirectory;

/// Which step produced a match.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Alias,
    Nearest { distance: f64 },
}

impl MatchTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Alias => "alias",
            Self::Nearest { .. } => "nearest",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchOutcome<'a> {
    pub index: usize,
    pub record: &'a CatalogRecord,
    pub tier: MatchTier,
}

#[derive(Clone, Debug, Default)]
pub struct Matcher {
    directory: IssueDirectory,
}

impl Matcher {
    pub fn new(directory: IssueDirectory) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &IssueDirectory {
        &self.directory
    }

    /// Normalizes the query and resolves the issue through the directory, so
    /// `"pimples"` and `"Pimples"` are the same request.
    pub fn prepare(&self, query: &UserQuery) -> UserQuery {
        let mut prepared = query.normalized();
        prepared.issue = self.directory.resolve(&prepared.issue);
        prepared
    }

    pub fn resolve<'c>(&self, catalog: &'c Catalog, query: &UserQuery) -> MatchOutcome<'c> {
        let query = self.prepare(query);

        let (index, tier) = if let Some(index) = exact_match(catalog, &query) {
            (index, MatchTier::Exact)
        } else if let Some(index) = self.alias_match(catalog, &query) {
            (index, MatchTier::Alias)
        } else {
            let (index, distance) = nearest_neighbor(catalog, &query);
            (index, MatchTier::Nearest { distance })
        };

        tracing::debug!(
            event_name = "matching.resolved",
            issue = %query.issue,
            gender = %query.gender,
            skin_or_scalp_type = %query.skin_or_scalp_type,
            tier = tier.as_str(),
            catalog_index = index,
            "routine resolved"
        );

        MatchOutcome { index, record: &catalog.records()[index], tier }
    }

    fn alias_match(&self, catalog: &Catalog, query: &UserQuery) -> Option<usize> {
        let group = self.directory.synonym_group(&query.issue)?;
        let gender = label_key(&query.gender);
        let kind = label_key(&query.skin_or_scalp_type);

        catalog.records().iter().zip(catalog.keys()).position(|(record, key)| {
            group.covers(&record.issue) && key.gender == gender && key.skin_or_scalp_type == kind
        })
    }
}

fn exact_match(catalog: &Catalog, query: &UserQuery) -> Option<usize> {
    let issue = label_key(&query.issue);
    let gender = label_key(&query.gender);
    let kind = label_key(&query.skin_or_scalp_type);

    catalog.keys().iter().position(|key| {
        key.issue == issue && key.gender == gender && key.skin_or_scalp_type == kind
    })
}

/// k = 1 over Euclidean distance; ties keep the lowest catalog index.
///
/// When the catalog knows the query's issue, only rows with that issue are
/// candidates, so the numeric axes can never pull in another issue's routine.
fn nearest_neighbor(catalog: &Catalog, query: &UserQuery) -> (usize, f64) {
    let query_row = catalog.encoding().encode_query(query);
    let known_issue = catalog.encoding().issue.encode(&query.issue);

    let (index, squared) = catalog
        .encoded_rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| known_issue.map_or(true, |issue| row.issue == issue))
        .map(|(index, row)| (index, query_row.squared_distance_to(row)))
        .fold((0, f64::INFINITY), |best, candidate| if candidate.1 < best.1 { candidate } else { best });

    (index, squared.sqrt())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{MatchTier, Matcher};
    use crate::catalog::{Catalog, CatalogRecord};
    use crate::domain::query::{LifestyleFactors, UserQuery};

    fn record(issue: &str, gender: &str, kind: &str) -> CatalogRecord {
        CatalogRecord {
            issue: issue.to_string(),
            gender: gender.to_string(),
            skin_or_scalp_type: kind.to_string(),
            morning_routine: format!("{issue} morning"),
            night_routine: format!("{issue} night"),
            remedies: Vec::new(),
            linked_products: Default::default(),
            age: None,
            sleep_hours: None,
            factors: LifestyleFactors::default(),
        }
    }

    fn catalog(records: Vec<CatalogRecord>) -> Catalog {
        Catalog::new(records).expect("non-empty catalog")
    }

    #[test]
    fn exact_match_ignores_case() {
        let catalog = catalog(vec![record("Pimples", "Female", "Oily")]);
        let outcome =
            Matcher::default().resolve(&catalog, &UserQuery::new("Pimples", "female", "oily"));

        assert_eq!(outcome.index, 0);
        assert_eq!(outcome.tier, MatchTier::Exact);
    }

    #[test]
    fn slug_resolves_before_exact_match() {
        let catalog = catalog(vec![
            record("Pimples", "Female", "Dry"),
            record("Dark Circles", "Female", "Dry"),
        ]);
        let outcome =
            Matcher::default().resolve(&catalog, &UserQuery::new("darkspots", " FEMALE", "dry "));

        assert_eq!(outcome.index, 1);
        assert_eq!(outcome.tier, MatchTier::Exact);
    }

    #[test]
    fn exact_match_takes_precedence_and_first_record_wins() {
        let catalog = catalog(vec![
            record("Pimples", "Male", "Dry"),
            record("Pimples", "Female", "Oily"),
            record("Pimples", "Female", "Oily"),
        ]);
        let outcome =
            Matcher::default().resolve(&catalog, &UserQuery::new("pimples", "female", "oily"));

        assert_eq!(outcome.index, 1);
        assert_eq!(outcome.tier, MatchTier::Exact);
    }

    #[test]
    fn synonym_group_relaxes_issue() {
        let catalog = catalog(vec![
            record("Pimples", "Male", "Oily"),
            record("Whiteheads", "Female", "Oily"),
            record("Blackheads", "Male", "Oily"),
        ]);
        let outcome =
            Matcher::default().resolve(&catalog, &UserQuery::new("blackheads", "male", "oily"));

        assert_eq!(outcome.index, 2);
        assert_eq!(outcome.tier, MatchTier::Alias);
    }

    #[test]
    fn nearest_neighbor_is_deterministic_and_breaks_ties_by_index() {
        let catalog = catalog(vec![
            record("Pimples", "Female", "Oily"),
            record("Pimples", "Female", "Dry"),
            record("Dark Circles", "Male", "Dry"),
            record("Pimples", "Male", "Oily"),
        ]);
        let matcher = Matcher::default();
        let query = UserQuery::new("Pimples", "Male", "Dry");

        let first = matcher.resolve(&catalog, &query);
        let second = matcher.resolve(&catalog, &query);

        assert_eq!(first.index, 1);
        assert_eq!(first.tier, MatchTier::Nearest { distance: 1.0 });
        assert_eq!(first, second);
    }

    #[test]
    fn unseen_issue_falls_back_to_first_label() {
        let catalog = catalog(vec![
            record("Pimples", "Female", "Oily"),
            record("Dark Circles", "Female", "Oily"),
        ]);
        let outcome =
            Matcher::default().resolve(&catalog, &UserQuery::new("Rosacea", "Female", "Oily"));

        assert_eq!(outcome.record.issue, "Dark Circles");
        assert_eq!(outcome.tier, MatchTier::Nearest { distance: 0.0 });
    }

    #[test]
    fn numeric_attributes_steer_the_fallback() {
        let mut young = record("Hairfall", "Male", "Oily");
        young.age = Some(20);
        young.sleep_hours = Some(8);
        let mut older = record("Hairfall", "Male", "Oily");
        older.age = Some(45);
        older.sleep_hours = Some(5);
        let catalog = catalog(vec![young, older]);

        let query = UserQuery::new("Hairfall", "Male", "Dry").with_age(44).with_sleep_hours(5);
        let outcome = Matcher::default().resolve(&catalog, &query);

        assert_eq!(outcome.index, 1);
        assert!(matches!(outcome.tier, MatchTier::Nearest { .. }));
    }

    #[test]
    fn fallback_stays_within_a_known_issue() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/hair_catalog.json");
        let catalog = Catalog::load(Path::new(path)).expect("bundled hair catalog");

        let query = UserQuery::new("Hairfall", "Female", "Oily").with_age(28).with_sleep_hours(7);
        let outcome = Matcher::default().resolve(&catalog, &query);

        assert_eq!(outcome.record.issue, "Hairfall");
        assert!(matches!(outcome.tier, MatchTier::Nearest { .. }));
    }

    #[test]
    fn supplied_factors_steer_the_fallback() {
        let mut low = record("Dandruff", "Male", "Oily");
        low.factors.water_intake = Some("Low".to_string());
        let mut high = record("Dandruff", "Male", "Oily");
        high.factors.water_intake = Some("High".to_string());
        let catalog = catalog(vec![low, high]);

        let query = UserQuery::new("Dandruff", "Female", "Oily").with_factors(LifestyleFactors {
            water_intake: Some("high".to_string()),
            ..LifestyleFactors::default()
        });
        let outcome = Matcher::default().resolve(&catalog, &query);

        assert_eq!(outcome.index, 1);
        assert_eq!(outcome.tier, MatchTier::Nearest { distance: 0.0 });
    }

    #[test]
    fn every_query_resolves_to_one_record() {
        let catalog = catalog(vec![record("Pimples", "Female", "Oily")]);
        let matcher = Matcher::default();

        for query in [
            UserQuery::new("", "", ""),
            UserQuery::new("Unknown", "Other", "Scaly"),
            UserQuery::new("whiteheads", "male", "dry").with_age(70),
        ] {
            let outcome = matcher.resolve(&catalog, &query);
            assert_eq!(outcome.index, 0);
        }
    }
}
