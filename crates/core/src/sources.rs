use crate::catalog::{CatalogError, CatalogSet};
use crate::config::CatalogConfig;
use crate::stress::StressTips;
use crate::womens::{MenstrualGuide, PregnancyGuide};

/// Every read-only advice source, loaded together at startup.
#[derive(Clone, Debug)]
pub struct AdviceSources {
    pub catalogs: CatalogSet,
    pub stress_tips: StressTips,
    pub menstrual: MenstrualGuide,
    pub pregnancy: PregnancyGuide,
}

impl AdviceSources {
    /// Fails on the first source that is missing, malformed or empty.
    pub fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Ok(Self {
            catalogs: CatalogSet::load(&config.skincare_path, &config.hair_path)?,
            stress_tips: StressTips::load(&config.stress_tips_path)?,
            menstrual: MenstrualGuide::load(&config.menstrual_guide_path)?,
            pregnancy: PregnancyGuide::load(&config.pregnancy_guide_path)?,
        })
    }

    /// Catalogs only, with empty guides. Used where the tips do not matter.
    pub fn from_catalogs(catalogs: CatalogSet) -> Self {
        Self {
            catalogs,
            stress_tips: StressTips::default(),
            menstrual: MenstrualGuide::default(),
            pregnancy: PregnancyGuide::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::AdviceSources;
    use crate::catalog::CatalogError;
    use crate::config::CatalogConfig;

    fn bundled() -> CatalogConfig {
        let data = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data");
        CatalogConfig {
            skincare_path: data.join("skincare_catalog.json"),
            hair_path: data.join("hair_catalog.json"),
            stress_tips_path: data.join("stress_tips.json"),
            menstrual_guide_path: data.join("menstrual_guide.json"),
            pregnancy_guide_path: data.join("pregnancy_guide.json"),
        }
    }

    #[test]
    fn bundled_sources_load() {
        let sources = AdviceSources::load(&bundled()).expect("bundled sources");
        assert_eq!(sources.catalogs.hair.len(), 4);
        assert!(sources.pregnancy.covers_month(9));
    }

    #[test]
    fn missing_guide_names_its_path() {
        let mut config = bundled();
        config.pregnancy_guide_path = PathBuf::from("absent/pregnancy.json");

        let error = AdviceSources::load(&config).expect_err("missing guide");
        assert!(matches!(error, CatalogError::Read { ref path, .. } if path.contains("absent")));
    }
}
