use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while turning an upstream payload into exam records.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("payload must be {{ exams: [...] }}, an array of exams, or a single exam object")]
    UnsupportedShape,

    #[error("exam[{exam}]: name is required")]
    MissingName { exam: usize },

    #[error("exam[{exam}]: date `{value}` is invalid")]
    InvalidDate { exam: usize, value: String },

    #[error("exam[{exam}]: scores must be a non-empty array")]
    EmptyScores { exam: usize },

    #[error("exam[{exam}]: scores[{index}].subject is required")]
    MissingSubject { exam: usize, index: usize },

    #[error("exam[{exam}]: scores[{index}].score must be a number")]
    InvalidScore { exam: usize, index: usize },

    #[error("exam[{exam}]: scores[{index}].maxScore must be > 0")]
    NonPositiveMaxScore { exam: usize, index: usize },

    #[error("exam[{exam}]: duplicate subject: {subject}")]
    DuplicateSubject { exam: usize, subject: String },
}

/// Failures raised while loading or validating a subject catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("exploratory_threshold must be at least 1")]
    ZeroThreshold,

    #[error("recommendation_limit must be at least 1")]
    ZeroRecommendationLimit,

    #[error("compulsory subject list cannot be empty")]
    NoCompulsorySubjects,

    #[error("combination `{name}` must list exactly 3 distinct subjects")]
    InvalidCombination { name: String },
}
