//! Per-subject score dispersion across the exam history.

use crate::catalog::Catalog;
use crate::models::{Sitting, StabilityRow, Subject};
use crate::phase::PhaseDecision;

/// Rounds to the nearest integer, halves toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Rounds to one decimal from the exact stored value, so `1.4499…` stays `1.4`.
///
/// Exact binary ties (`x.25`, `x.75`) round up.
pub fn round_one_decimal(value: f64) -> f64 {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return (value * 10.0 + 0.5).floor() / 10.0;
    }
    format!("{value:.1}").parse().unwrap_or(value)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; zero for fewer than two samples.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Builds one row per relevant subject, most stable first.
///
/// Each subject only contributes samples from exams where it was tested.
/// Equal deviations keep the order in which subjects first appeared.
pub fn analyze(sittings: &[Sitting<'_>], decision: &PhaseDecision, catalog: &Catalog) -> Vec<StabilityRow> {
    let mut series: Vec<(Subject, Vec<f64>)> = Vec::new();

    for sitting in sittings {
        for score in &sitting.scores {
            if !decision.is_relevant(&score.subject) {
                continue;
            }
            match series.iter().position(|(subject, _)| subject == &score.subject) {
                Some(index) => series[index].1.push(score.percent()),
                None => series.push((score.subject.clone(), vec![score.percent()])),
            }
        }
    }

    let mut rows: Vec<StabilityRow> = series
        .into_iter()
        .map(|(subject, samples)| {
            let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
            let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            StabilityRow {
                label: catalog.label(&subject),
                subject,
                mean: round_half_up(mean(&samples)),
                std_dev: round_one_decimal(population_std_dev(&samples)),
                min: round_half_up(min),
                max: round_half_up(max),
                samples: samples.len(),
            }
        })
        .collect();

    rows.sort_by(|a, b| a.std_dev.total_cmp(&b.std_dev));
    rows
}
