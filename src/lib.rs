//! Exam performance analysis for a single student's history: trend with
//! projection across a changing subject set, short-stave gaps, normalized
//! capability, score stability, and elective combination suggestions.

pub mod analysis;
pub mod catalog;
pub mod error;
pub mod ingest;
pub mod models;
pub mod phase;
pub mod profile;
pub mod recommend;
pub mod report;
pub mod sample;
pub mod selection;
pub mod stability;
pub mod timeline;

pub use analysis::{analyze, Analyzer};
pub use catalog::Catalog;
pub use models::AnalysisReport;
pub use selection::{parse_selection, RawSelection};
