use crate::catalog::Catalog;
use crate::models::{Phase, Recommendation, Sitting};
use crate::phase::PhaseDecision;
use crate::stability::round_half_up;

/// Ranks elective combinations by the total the latest exam would have
/// produced under each of them. Only meaningful before specialization, so a
/// focused student gets an empty list.
///
/// Subjects missing from the latest exam count as 0. Equal totals keep
/// catalog order.
pub fn recommend(latest: &Sitting<'_>, decision: &PhaseDecision, catalog: &Catalog) -> Vec<Recommendation> {
    if decision.phase != Phase::Exploratory {
        return Vec::new();
    }

    let compulsory_total: f64 = catalog
        .compulsory
        .iter()
        .map(|subject| latest.score_of(subject).unwrap_or(0.0))
        .sum();

    let mut ranked: Vec<(f64, Recommendation)> = catalog
        .combinations
        .iter()
        .map(|combination| {
            let elective_total: f64 = combination
                .subjects
                .iter()
                .map(|subject| latest.score_of(subject).unwrap_or(0.0))
                .sum();
            let total = compulsory_total + elective_total;
            (
                total,
                Recommendation {
                    name: combination.name.clone(),
                    total: round_half_up(total),
                    subjects: combination.subjects.iter().map(|s| catalog.label(s)).collect(),
                },
            )
        })
        .collect();

    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked
        .into_iter()
        .take(catalog.recommendation_limit)
        .map(|(_, recommendation)| recommendation)
        .collect()
}
