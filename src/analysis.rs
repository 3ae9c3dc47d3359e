//! Report assembly: runs every sub-analysis over one normalized snapshot.

use crate::catalog::Catalog;
use crate::models::{AnalysisReport, Charts, ExamRecord, Overview, Sitting, StabilityRow};
use crate::phase::{self, PhaseDecision};
use crate::selection::{parse_selection, RawSelection};
use crate::{profile, recommend, stability, timeline};

/// Analysis engine bound to one subject catalog.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    catalog: Catalog,
}

impl Analyzer {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns `None` when there are no exams yet.
    ///
    /// Input order does not matter; exams are ordered by date, and exams on
    /// the same date keep their input order.
    pub fn analyze(&self, exams: &[ExamRecord], selection: Option<&RawSelection>) -> Option<AnalysisReport> {
        let mut sittings: Vec<Sitting<'_>> = exams.iter().map(Sitting::from_record).collect();
        sittings.sort_by_key(|s| s.exam.date);
        let latest = sittings.last()?;

        let selected = parse_selection(selection, &self.catalog.compulsory);
        let decision = phase::classify(latest, &selected, &self.catalog);

        let relevant = profile::relevant_scores(latest, &decision);
        let stability_rows = stability::analyze(&sittings, &decision, &self.catalog);

        let charts = Charts {
            timeline: timeline::project(&sittings, &decision, &self.catalog),
            weakness: profile::weakness(&relevant, &self.catalog),
            capability: profile::capability(&relevant, &self.catalog),
            recommendations: recommend::recommend(latest, &decision, &self.catalog),
            stability: stability_rows,
        };

        let overview = self.overview(exams.len(), latest, &decision, &charts.stability);

        tracing::debug!(
            exams = overview.exam_count,
            phase = ?overview.phase,
            stability_rows = charts.stability.len(),
            recommendations = charts.recommendations.len(),
            "analysis complete"
        );

        Some(AnalysisReport { overview, charts })
    }

    fn overview(
        &self,
        exam_count: usize,
        latest: &Sitting<'_>,
        decision: &PhaseDecision,
        stability_rows: &[StabilityRow],
    ) -> Overview {
        Overview {
            phase: decision.phase,
            exam_count,
            latest_total: latest.total(),
            max_possible: self.catalog.max_possible(decision.phase),
            best_subject: best_subject(stability_rows),
            most_unstable: stability_rows.last().map(|row| row.label.clone()),
        }
    }
}

/// Highest mean; on a tie the row listed first (the more stable one) wins.
fn best_subject(rows: &[StabilityRow]) -> Option<String> {
    let mut best: Option<&StabilityRow> = None;
    for row in rows {
        if best.map_or(true, |current| row.mean > current.mean) {
            best = Some(row);
        }
    }
    best.map(|row| row.label.clone())
}

/// Analyzes with the built-in catalog.
pub fn analyze(exams: &[ExamRecord], selection: Option<&RawSelection>) -> Option<AnalysisReport> {
    Analyzer::default().analyze(exams, selection)
}
