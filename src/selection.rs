//! Parse-or-default handling of the stored elective selection.

use serde::{Deserialize, Serialize};

use crate::catalog::ELECTIVE_COUNT;
use crate::models::{SelectedSubjects, Subject};

/// Selection value as the selection store hands it over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSelection {
    List(Vec<String>),
    Text(String),
    Other(serde_json::Value),
}

impl From<&str> for RawSelection {
    fn from(value: &str) -> Self {
        RawSelection::Text(value.to_string())
    }
}

impl<S: AsRef<str>> From<&[S]> for RawSelection {
    fn from(values: &[S]) -> Self {
        RawSelection::List(values.iter().map(|v| v.as_ref().to_string()).collect())
    }
}

/// Parses a raw selection. Anything that is not exactly three distinct,
/// non-compulsory subjects yields an empty selection.
///
/// Text is read as a JSON array (`["Physics","Chemistry","Biology"]`) or, when
/// it does not start with `[`, as a comma-separated list.
pub fn parse_selection(raw: Option<&RawSelection>, compulsory: &[Subject]) -> SelectedSubjects {
    let names = match raw {
        None => return SelectedSubjects::none(),
        Some(RawSelection::List(names)) => names.clone(),
        Some(RawSelection::Text(text)) => match split_text(text) {
            Some(names) => names,
            None => {
                tracing::debug!(raw = %text, "selection text is not a subject list");
                return SelectedSubjects::none();
            }
        },
        Some(RawSelection::Other(value)) => {
            tracing::debug!(raw = %value, "unsupported selection value");
            return SelectedSubjects::none();
        }
    };

    let subjects: Vec<Subject> = names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(Subject::from)
        .collect();

    if subjects.is_empty() {
        return SelectedSubjects::none();
    }

    let distinct = subjects
        .iter()
        .enumerate()
        .all(|(i, s)| !subjects[..i].contains(s));
    let elective_only = subjects.iter().all(|s| !compulsory.contains(s));

    if subjects.len() != ELECTIVE_COUNT || !distinct || !elective_only {
        tracing::debug!(?subjects, "selection is not a valid elective track");
        return SelectedSubjects::none();
    }

    SelectedSubjects::from_validated(subjects)
}

fn split_text(text: &str) -> Option<Vec<String>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str::<Vec<String>>(trimmed).ok();
    }
    Some(trimmed.split(',').map(str::to_string).collect())
}
