//! Latest-exam views: the short-stave gap bars and the normalized radar.

use crate::catalog::Catalog;
use crate::models::{CapabilityPoint, Sitting, SubjectScore, WeaknessRow};
use crate::phase::PhaseDecision;

pub const FULL_MARK: i64 = 100;

pub fn relevant_scores<'a>(latest: &Sitting<'a>, decision: &PhaseDecision) -> Vec<&'a SubjectScore> {
    latest
        .scores
        .iter()
        .copied()
        .filter(|s| decision.is_relevant(&s.subject))
        .collect()
}

/// Gap against the cohort average, most deficient first.
///
/// A missing cohort average counts as 0.
pub fn weakness(relevant: &[&SubjectScore], catalog: &Catalog) -> Vec<WeaknessRow> {
    let mut rows: Vec<WeaknessRow> = relevant
        .iter()
        .map(|s| {
            let gap = s.score - s.cohort_average.unwrap_or(0.0);
            WeaknessRow {
                subject: s.subject.clone(),
                label: catalog.label(&s.subject),
                score: s.score,
                gap,
                is_weak: gap < 0.0,
            }
        })
        .collect();

    rows.sort_by(|a, b| a.gap.total_cmp(&b.gap));
    rows
}

pub fn capability(relevant: &[&SubjectScore], catalog: &Catalog) -> Vec<CapabilityPoint> {
    relevant
        .iter()
        .map(|s| CapabilityPoint {
            subject: s.subject.clone(),
            label: catalog.label(&s.subject),
            value: crate::stability::round_half_up(s.percent()),
            full_mark: FULL_MARK,
        })
        .collect()
}
