//! Subject catalog: the configuration the engine is parameterized over.
//!
//! Everything that used to be a hard-coded constant (the candidate elective
//! combinations, display labels, the exploratory threshold) lives here so
//! callers can inject alternate catalogs.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::models::{Phase, Subject};

/// Number of elective subjects in a finalized track.
pub const ELECTIVE_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub name: String,
    pub subjects: Vec<Subject>,
}

impl Combination {
    pub fn new(name: &str, subjects: [Subject; ELECTIVE_COUNT]) -> Self {
        Self {
            name: name.to_string(),
            subjects: subjects.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseMaxima {
    pub exploratory: f64,
    pub focused: f64,
}

impl Default for PhaseMaxima {
    fn default() -> Self {
        Self {
            exploratory: 1050.0,
            focused: 750.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// An exam with more subjects than this belongs to the exploratory phase.
    pub exploratory_threshold: usize,
    pub recommendation_limit: usize,
    pub compulsory: Vec<Subject>,
    pub max_possible: PhaseMaxima,
    pub labels: BTreeMap<String, String>,
    pub combinations: Vec<Combination>,
}

impl Default for Catalog {
    fn default() -> Self {
        let labels = [
            ("Chinese", "语文"),
            ("Math", "数学"),
            ("English", "英语"),
            ("Physics", "物理"),
            ("Chemistry", "化学"),
            ("Biology", "生物"),
            ("Politics", "政治"),
            ("History", "历史"),
            ("Geography", "地理"),
        ]
        .into_iter()
        .map(|(id, label)| (id.to_string(), label.to_string()))
        .collect();

        Self {
            exploratory_threshold: 6,
            recommendation_limit: 3,
            compulsory: vec![Subject::Chinese, Subject::Math, Subject::English],
            max_possible: PhaseMaxima::default(),
            labels,
            combinations: vec![
                Combination::new(
                    "物化生 (Pure Science)",
                    [Subject::Physics, Subject::Chemistry, Subject::Biology],
                ),
                Combination::new(
                    "物化地 (Broad Scope)",
                    [Subject::Physics, Subject::Chemistry, Subject::Geography],
                ),
                Combination::new(
                    "史政地 (Humanities)",
                    [Subject::History, Subject::Politics, Subject::Geography],
                ),
                Combination::new(
                    "物生政 (Civil Service)",
                    [Subject::Physics, Subject::Biology, Subject::Politics],
                ),
            ],
        }
    }
}

impl Catalog {
    /// Parses a catalog. A `[labels]` table is layered over the built-in
    /// labels rather than replacing them.
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let mut catalog: Catalog = toml::from_str(source)?;
        for (id, label) in Catalog::default().labels {
            catalog.labels.entry(id).or_insert(label);
        }
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let source = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&source)?;
        tracing::debug!(
            path = %path.display(),
            combinations = catalog.combinations.len(),
            "loaded subject catalog"
        );
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.exploratory_threshold == 0 {
            return Err(CatalogError::ZeroThreshold);
        }
        if self.recommendation_limit == 0 {
            return Err(CatalogError::ZeroRecommendationLimit);
        }
        if self.compulsory.is_empty() {
            return Err(CatalogError::NoCompulsorySubjects);
        }
        for combination in &self.combinations {
            let subjects = &combination.subjects;
            let distinct = subjects
                .iter()
                .enumerate()
                .all(|(i, s)| !subjects[..i].contains(s));
            if subjects.len() != ELECTIVE_COUNT || !distinct {
                return Err(CatalogError::InvalidCombination {
                    name: combination.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Display label for a subject, falling back to its raw identifier.
    pub fn label(&self, subject: &Subject) -> String {
        self.labels
            .get(subject.as_str())
            .cloned()
            .unwrap_or_else(|| subject.as_str().to_string())
    }

    pub fn max_possible(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Exploratory => self.max_possible.exploratory,
            Phase::Focused => self.max_possible.focused,
        }
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
