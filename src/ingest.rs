//! Record source: turns JSON payloads and CSV exports into validated exam records.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IngestError;
use crate::models::{default_exam_type, ExamRecord, SubjectScore, DEFAULT_MAX_SCORE};
use crate::selection::RawSelection;

/// Everything the engine needs for one student.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub exams: Vec<ExamRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_subjects: Option<RawSelection>,
}

/// Number given either as a JSON number or as text typed into a form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn value(&self) -> Option<f64> {
        let value = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                text.parse::<f64>().ok()?
            }
        };
        value.is_finite().then_some(value)
    }
}

fn rank(value: Option<&Numeric>) -> Option<u32> {
    value
        .and_then(Numeric::value)
        .filter(|v| *v >= 0.0)
        .map(|v| v.trunc() as u32)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExamDraft {
    id: Option<Uuid>,
    name: Option<String>,
    date: Option<String>,
    #[serde(rename = "type")]
    exam_type: Option<String>,
    total_score: Option<Numeric>,
    class_rank: Option<Numeric>,
    grade_rank: Option<Numeric>,
    #[serde(default)]
    scores: Vec<ScoreDraft>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreDraft {
    subject: Option<String>,
    score: Option<Numeric>,
    max_score: Option<Numeric>,
    #[serde(alias = "cohortAverage")]
    grade_avg_score: Option<Numeric>,
    class_rank: Option<Numeric>,
    grade_rank: Option<Numeric>,
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

impl ExamDraft {
    fn validate(self, exam: usize) -> Result<ExamRecord, IngestError> {
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(IngestError::MissingName { exam });
        }

        let exam_type = self
            .exam_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(default_exam_type);

        let date = match self.date.as_deref() {
            Some(raw) => parse_date(raw).ok_or_else(|| IngestError::InvalidDate {
                exam,
                value: raw.to_string(),
            })?,
            None => Utc::now().date_naive(),
        };

        if self.scores.is_empty() {
            return Err(IngestError::EmptyScores { exam });
        }

        let mut scores: Vec<SubjectScore> = Vec::with_capacity(self.scores.len());
        for (index, draft) in self.scores.iter().enumerate() {
            let subject = draft.subject.as_deref().map(str::trim).unwrap_or_default();
            if subject.is_empty() {
                return Err(IngestError::MissingSubject { exam, index });
            }

            let score = draft
                .score
                .as_ref()
                .and_then(Numeric::value)
                .ok_or(IngestError::InvalidScore { exam, index })?;

            let max_score = draft
                .max_score
                .as_ref()
                .and_then(Numeric::value)
                .unwrap_or(DEFAULT_MAX_SCORE);
            if max_score <= 0.0 {
                return Err(IngestError::NonPositiveMaxScore { exam, index });
            }

            if scores.iter().any(|s| s.subject.as_str() == subject) {
                return Err(IngestError::DuplicateSubject {
                    exam,
                    subject: subject.to_string(),
                });
            }

            scores.push(SubjectScore {
                subject: subject.into(),
                score,
                max_score,
                cohort_average: draft.grade_avg_score.as_ref().and_then(Numeric::value),
                class_rank: rank(draft.class_rank.as_ref()),
                grade_rank: rank(draft.grade_rank.as_ref()),
            });
        }

        let computed_total: f64 = scores.iter().map(|s| s.score).sum();

        Ok(ExamRecord {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            name: name.to_string(),
            date,
            exam_type,
            total_score: Some(
                self.total_score
                    .as_ref()
                    .and_then(Numeric::value)
                    .unwrap_or(computed_total),
            ),
            class_rank: rank(self.class_rank.as_ref()),
            grade_rank: rank(self.grade_rank.as_ref()),
            scores,
        })
    }
}

fn validate_all(drafts: Vec<ExamDraft>) -> Result<Vec<ExamRecord>, IngestError> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| draft.validate(index))
        .collect()
}

/// Accepts `{ "exams": [...] }`, a bare array, `{ "exam": {...} }`, or a single exam.
pub fn from_json_str(source: &str) -> Result<Snapshot, IngestError> {
    let value: serde_json::Value = serde_json::from_str(source)?;

    let (exams, selection) = match value {
        serde_json::Value::Array(items) => (items, None),
        serde_json::Value::Object(mut map) => {
            let selection = map
                .remove("selectedSubjects")
                .filter(|v| !v.is_null())
                .map(serde_json::from_value::<RawSelection>)
                .transpose()?;

            let exams = match (map.remove("exams"), map.remove("exam")) {
                (Some(serde_json::Value::Array(items)), _) => items,
                (None, Some(exam @ serde_json::Value::Object(_))) => vec![exam],
                (None, None) if map.contains_key("name") || map.contains_key("scores") => {
                    vec![serde_json::Value::Object(map)]
                }
                _ => return Err(IngestError::UnsupportedShape),
            };
            (exams, selection)
        }
        _ => return Err(IngestError::UnsupportedShape),
    };

    let drafts = exams
        .into_iter()
        .map(serde_json::from_value::<ExamDraft>)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Snapshot {
        exams: validate_all(drafts)?,
        selected_subjects: selection,
    })
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    exam_name: String,
    date: String,
    #[serde(default)]
    exam_type: Option<String>,
    #[serde(default)]
    total_score: Option<f64>,
    #[serde(default)]
    class_rank: Option<u32>,
    #[serde(default)]
    grade_rank: Option<u32>,
    subject: String,
    score: Option<f64>,
    #[serde(default)]
    max_score: Option<f64>,
    #[serde(default)]
    grade_avg_score: Option<f64>,
    #[serde(default)]
    subject_class_rank: Option<u32>,
    #[serde(default)]
    subject_grade_rank: Option<u32>,
}

/// Reads one subject score per row and groups rows into exams by name and date.
pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Snapshot, IngestError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut grouped: Vec<((String, String), ExamDraft)> = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let key = (row.exam_name.clone(), row.date.clone());

        let position = match grouped.iter().position(|(k, _)| *k == key) {
            Some(position) => position,
            None => {
                grouped.push((
                    key,
                    ExamDraft {
                        name: Some(row.exam_name.clone()),
                        date: Some(row.date.clone()),
                        exam_type: row.exam_type.clone(),
                        total_score: row.total_score.map(Numeric::Number),
                        class_rank: row.class_rank.map(|r| Numeric::Number(r as f64)),
                        grade_rank: row.grade_rank.map(|r| Numeric::Number(r as f64)),
                        ..ExamDraft::default()
                    },
                ));
                grouped.len() - 1
            }
        };

        grouped[position].1.scores.push(ScoreDraft {
            subject: Some(row.subject),
            score: row.score.map(Numeric::Number),
            max_score: row.max_score.map(Numeric::Number),
            grade_avg_score: row.grade_avg_score.map(Numeric::Number),
            class_rank: row.subject_class_rank.map(|r| Numeric::Number(r as f64)),
            grade_rank: row.subject_grade_rank.map(|r| Numeric::Number(r as f64)),
        });
    }

    let drafts = grouped.into_iter().map(|(_, draft)| draft).collect();
    Ok(Snapshot {
        exams: validate_all(drafts)?,
        selected_subjects: None,
    })
}

/// Loads a snapshot from disk; `.csv` files go through the CSV reader, anything else is JSON.
pub fn load_path(path: &Path) -> Result<Snapshot, IngestError> {
    let io_error = |source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    };

    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let snapshot = if is_csv {
        let file = std::fs::File::open(path).map_err(io_error)?;
        from_csv_reader(file)?
    } else {
        let source = std::fs::read_to_string(path).map_err(io_error)?;
        from_json_str(&source)?
    };

    tracing::info!(
        path = %path.display(),
        exams = snapshot.exams.len(),
        "loaded exam records"
    );
    Ok(snapshot)
}
