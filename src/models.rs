use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_MAX_SCORE: f64 = 100.0;

/// Subject identifier. Unknown identifiers are carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Subject {
    Chinese,
    Math,
    English,
    Physics,
    Chemistry,
    Biology,
    Politics,
    History,
    Geography,
    Other(String),
}

impl Subject {
    pub fn as_str(&self) -> &str {
        match self {
            Subject::Chinese => "Chinese",
            Subject::Math => "Math",
            Subject::English => "English",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
            Subject::Politics => "Politics",
            Subject::History => "History",
            Subject::Geography => "Geography",
            Subject::Other(raw) => raw,
        }
    }
}

impl From<String> for Subject {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Chinese" => Subject::Chinese,
            "Math" => Subject::Math,
            "English" => Subject::English,
            "Physics" => Subject::Physics,
            "Chemistry" => Subject::Chemistry,
            "Biology" => Subject::Biology,
            "Politics" => Subject::Politics,
            "History" => Subject::History,
            "Geography" => Subject::Geography,
            _ => Subject::Other(value),
        }
    }
}

impl From<&str> for Subject {
    fn from(value: &str) -> Self {
        Subject::from(value.to_string())
    }
}

impl From<Subject> for String {
    fn from(value: Subject) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectScore {
    pub subject: Subject,
    pub score: f64,
    #[serde(default = "default_max_score")]
    pub max_score: f64,
    #[serde(default, alias = "gradeAvgScore", skip_serializing_if = "Option::is_none")]
    pub cohort_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_rank: Option<u32>,
}

fn default_max_score() -> f64 {
    DEFAULT_MAX_SCORE
}

impl SubjectScore {
    pub fn new(subject: impl Into<Subject>, score: f64, max_score: f64) -> Self {
        Self {
            subject: subject.into(),
            score,
            max_score,
            cohort_average: None,
            class_rank: None,
            grade_rank: None,
        }
    }

    pub fn with_cohort_average(mut self, average: f64) -> Self {
        self.cohort_average = Some(average);
        self
    }

    /// Max score used for normalization; non-positive values fall back to 100.
    pub fn effective_max(&self) -> f64 {
        if self.max_score > 0.0 && self.max_score.is_finite() {
            self.max_score
        } else {
            DEFAULT_MAX_SCORE
        }
    }

    pub fn percent(&self) -> f64 {
        self.score / self.effective_max() * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "type", default = "default_exam_type")]
    pub exam_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_rank: Option<u32>,
    #[serde(default)]
    pub scores: Vec<SubjectScore>,
}

pub(crate) fn default_exam_type() -> String {
    "Mock".to_string()
}

/// Read-only view of one exam with its canonical subject scores
/// (first occurrence wins when a subject repeats).
#[derive(Debug, Clone)]
pub struct Sitting<'a> {
    pub exam: &'a ExamRecord,
    pub scores: Vec<&'a SubjectScore>,
}

impl<'a> Sitting<'a> {
    pub fn from_record(exam: &'a ExamRecord) -> Self {
        let mut scores: Vec<&'a SubjectScore> = Vec::with_capacity(exam.scores.len());

        for score in &exam.scores {
            if scores.iter().any(|kept| kept.subject == score.subject) {
                tracing::warn!(
                    exam = %exam.name,
                    subject = %score.subject,
                    "duplicate subject score ignored, keeping first occurrence"
                );
                continue;
            }
            if !(score.max_score > 0.0 && score.max_score.is_finite()) {
                tracing::warn!(
                    exam = %exam.name,
                    subject = %score.subject,
                    max_score = score.max_score,
                    "non-positive max score, normalizing against {}",
                    DEFAULT_MAX_SCORE
                );
            }
            scores.push(score);
        }

        Self { exam, scores }
    }

    pub fn subject_count(&self) -> usize {
        self.scores.len()
    }

    /// Declared total, or the sum of canonical scores when none was recorded.
    pub fn total(&self) -> f64 {
        self.exam
            .total_score
            .unwrap_or_else(|| self.scores.iter().map(|s| s.score).sum())
    }

    pub fn score_of(&self, subject: &Subject) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| &s.subject == subject)
            .map(|s| s.score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Exploratory,
    Focused,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Exploratory => "DISCOVERY (G10)",
            Phase::Focused => "FOCUS (G11/12)",
        }
    }
}

/// The student's finalized elective track: three subjects, or none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedSubjects {
    subjects: Vec<Subject>,
}

impl SelectedSubjects {
    pub(crate) fn from_validated(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }
}

/// Compulsory subjects plus the elected ones; empty when no selection exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoreSubjects(Vec<Subject>);

impl CoreSubjects {
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self(subjects)
    }

    pub fn is_specialized(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn contains(&self, subject: &Subject) -> bool {
        self.0.contains(subject)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub exam_name: String,
    pub date: NaiveDate,
    pub display_total: f64,
    pub grade_rank: Option<u32>,
    pub is_virtual: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaknessRow {
    pub subject: Subject,
    pub label: String,
    pub score: f64,
    pub gap: f64,
    pub is_weak: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityPoint {
    pub subject: Subject,
    pub label: String,
    pub value: i64,
    pub full_mark: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityRow {
    pub subject: Subject,
    pub label: String,
    pub mean: i64,
    pub std_dev: f64,
    pub min: i64,
    pub max: i64,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub name: String,
    pub total: i64,
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub phase: Phase,
    pub exam_count: usize,
    pub latest_total: f64,
    pub max_possible: f64,
    pub best_subject: Option<String>,
    pub most_unstable: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Charts {
    pub timeline: Vec<TimelinePoint>,
    pub weakness: Vec<WeaknessRow>,
    pub capability: Vec<CapabilityPoint>,
    pub stability: Vec<StabilityRow>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub overview: Overview,
    pub charts: Charts,
}
