use crate::catalog::Catalog;
use crate::models::{CoreSubjects, Phase, SelectedSubjects, Sitting, Subject};

/// Phase and core subject set for one analysis run.
///
/// The two are decided independently: the phase comes from the breadth of the
/// latest exam, the core set from whether a selection has been recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseDecision {
    pub phase: Phase,
    pub core: CoreSubjects,
}

impl PhaseDecision {
    /// Whether a subject counts toward latest-exam and historical analysis.
    ///
    /// A focused student with no recorded selection sees every subject.
    pub fn is_relevant(&self, subject: &Subject) -> bool {
        match self.phase {
            Phase::Exploratory => true,
            Phase::Focused => !self.core.is_specialized() || self.core.contains(subject),
        }
    }
}

pub fn classify(latest: &Sitting<'_>, selection: &SelectedSubjects, catalog: &Catalog) -> PhaseDecision {
    let phase = if latest.subject_count() > catalog.exploratory_threshold {
        Phase::Exploratory
    } else {
        Phase::Focused
    };

    let core = if selection.is_empty() {
        CoreSubjects::default()
    } else {
        CoreSubjects::new(
            catalog
                .compulsory
                .iter()
                .chain(selection.subjects())
                .cloned()
                .collect(),
        )
    };

    tracing::debug!(
        exam = %latest.exam.name,
        subjects = latest.subject_count(),
        ?phase,
        core = core.len(),
        "classified study phase"
    );

    PhaseDecision { phase, core }
}
