//! Read-only advice catalogs.
//!
//! A [`Catalog`] is loaded once at startup, rejects empty sources, and fits
//! its label encoding at construction so matching never re-fits per request.

mod encoding;
mod record;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use encoding::{LabelEncoding, LabelMap};
pub use record::CatalogRecord;

pub(crate) use encoding::EncodedRow;

use crate::domain::query::label_key;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog contains no records")]
    Empty,
    #[error("could not read catalog source `{path}`: {message}")]
    Read { path: String, message: String },
    #[error("could not parse catalog source `{source_name}`: {message}")]
    Parse { source_name: String, message: String },
}

/// Case-folded categorical key of a record, precomputed for exact matching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RecordKey {
    pub issue: String,
    pub gender: String,
    pub skin_or_scalp_type: String,
}

#[derive(Clone, Debug)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
    keys: Vec<RecordKey>,
    encoding: LabelEncoding,
    encoded: Vec<EncodedRow>,
}

impl Catalog {
    pub fn new(records: Vec<CatalogRecord>) -> Result<Self, CatalogError> {
        if records.is_empty() {
            return Err(CatalogError::Empty);
        }

        let keys = records
            .iter()
            .map(|record| RecordKey {
                issue: label_key(&record.issue),
                gender: label_key(&record.gender),
                skin_or_scalp_type: label_key(&record.skin_or_scalp_type),
            })
            .collect();
        let encoding = LabelEncoding::fit(&records);
        let encoded = records.iter().map(|record| encoding.encode_record(record)).collect();

        Ok(Self { records, keys, encoding, encoded })
    }

    pub fn from_json_str(raw: &str, source_name: &str) -> Result<Self, CatalogError> {
        let records = serde_json::from_str::<Vec<CatalogRecord>>(raw).map_err(|error| {
            CatalogError::Parse { source_name: source_name.to_string(), message: error.to_string() }
        })?;
        Self::new(records)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|error| CatalogError::Read {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
        let catalog = Self::from_json_str(&raw, &path.display().to_string())?;

        tracing::info!(
            event_name = "catalog.loaded",
            path = %path.display(),
            records = catalog.len(),
            issues = catalog.encoding.issue.classes().len(),
            "advice catalog loaded"
        );
        Ok(catalog)
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&CatalogRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn encoding(&self) -> &LabelEncoding {
        &self.encoding
    }

    pub(crate) fn keys(&self) -> &[RecordKey] {
        &self.keys
    }

    pub(crate) fn encoded_rows(&self) -> &[EncodedRow] {
        &self.encoded
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceDomain {
    Skincare,
    Hair,
}

impl AdviceDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skincare => "skincare",
            Self::Hair => "hair",
        }
    }
}

impl fmt::Display for AdviceDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdviceDomain {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "skincare" | "skin" => Ok(Self::Skincare),
            "hair" | "haircare" => Ok(Self::Hair),
            other => Err(CatalogError::Parse {
                source_name: "advice domain".to_string(),
                message: format!("unsupported domain `{other}` (expected skincare|hair)"),
            }),
        }
    }
}

/// The catalogs a running process serves, one per advice domain.
#[derive(Clone, Debug)]
pub struct CatalogSet {
    pub skincare: Catalog,
    pub hair: Catalog,
}

impl CatalogSet {
    pub fn load(skincare_path: &Path, hair_path: &Path) -> Result<Self, CatalogError> {
        Ok(Self { skincare: Catalog::load(skincare_path)?, hair: Catalog::load(hair_path)? })
    }

    pub fn for_domain(&self, domain: AdviceDomain) -> &Catalog {
        match domain {
            AdviceDomain::Skincare => &self.skincare,
            AdviceDomain::Hair => &self.hair,
        }
    }
}
