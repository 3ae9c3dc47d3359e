use crate::catalog::{Catalog, ELECTIVE_COUNT};
use crate::models::{Sitting, TimelinePoint};
use crate::phase::PhaseDecision;

/// Builds the chronological score/rank series.
///
/// `sittings` must already be in ascending date order. Broad exams seen under
/// a full core set (every compulsory subject plus three electives) are
/// re-totalled over the core subjects only and flagged as virtual.
pub fn project(sittings: &[Sitting<'_>], decision: &PhaseDecision, catalog: &Catalog) -> Vec<TimelinePoint> {
    let full_track = decision.core.len() == catalog.compulsory.len() + ELECTIVE_COUNT;

    sittings
        .iter()
        .map(|sitting| {
            let projected = full_track
                && sitting.subject_count() > catalog.exploratory_threshold;

            let display_total = if projected {
                sitting
                    .scores
                    .iter()
                    .filter(|s| decision.core.contains(&s.subject))
                    .map(|s| s.score)
                    .sum()
            } else {
                sitting.total()
            };

            TimelinePoint {
                exam_name: sitting.exam.name.clone(),
                date: sitting.exam.date,
                display_total,
                grade_rank: sitting.exam.grade_rank,
                is_virtual: projected,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoreSubjects, ExamRecord, Phase, Subject, SubjectScore};
    use chrono::NaiveDate;
    use uuid::Uuid;

    const ALL_NINE: [(&str, f64); 9] = [
        ("Chinese", 110.0),
        ("Math", 120.0),
        ("English", 115.0),
        ("Physics", 80.0),
        ("Chemistry", 75.0),
        ("Biology", 70.0),
        ("History", 60.0),
        ("Politics", 65.0),
        ("Geography", 70.0),
    ];

    fn exam(name: &str, month: u32, scores: &[(&str, f64)], total: Option<f64>) -> ExamRecord {
        ExamRecord {
            id: Uuid::nil(),
            name: name.to_string(),
            date: NaiveDate::from_ymd_opt(2023, month, 15).unwrap(),
            exam_type: "Mock".to_string(),
            total_score: total,
            class_rank: None,
            grade_rank: Some(40),
            scores: scores
                .iter()
                .map(|(s, v)| SubjectScore::new(*s, *v, 100.0))
                .collect(),
        }
    }

    fn science_core() -> PhaseDecision {
        PhaseDecision {
            phase: Phase::Focused,
            core: CoreSubjects::new(vec![
                Subject::Chinese,
                Subject::Math,
                Subject::English,
                Subject::Physics,
                Subject::Chemistry,
                Subject::Biology,
            ]),
        }
    }

    #[test]
    fn broad_exam_is_projected_onto_core_subjects() {
        let early = exam("G10 midterm", 1, &ALL_NINE, Some(765.0));
        let late = exam("G11 monthly", 9, &ALL_NINE[..6], Some(560.0));
        let sittings = vec![Sitting::from_record(&early), Sitting::from_record(&late)];

        let points = project(&sittings, &science_core(), &Catalog::default());

        assert_eq!(points.len(), 2);
        assert!(points[0].is_virtual);
        assert_eq!(points[0].display_total, 570.0);
        assert!(!points[1].is_virtual);
        assert_eq!(points[1].display_total, 560.0);
        assert_eq!(points[1].grade_rank, Some(40));
    }

    #[test]
    fn no_projection_without_core_set() {
        let early = exam("G10 midterm", 1, &ALL_NINE, Some(765.0));
        let sittings = vec![Sitting::from_record(&early)];
        let decision = PhaseDecision {
            phase: Phase::Exploratory,
            core: CoreSubjects::default(),
        };

        let points = project(&sittings, &decision, &Catalog::default());
        assert!(!points[0].is_virtual);
        assert_eq!(points[0].display_total, 765.0);
    }

    #[test]
    fn partial_core_set_is_not_projected() {
        let early = exam("G10 midterm", 1, &ALL_NINE, Some(765.0));
        let sittings = vec![Sitting::from_record(&early)];
        let decision = PhaseDecision {
            phase: Phase::Focused,
            core: CoreSubjects::new(vec![Subject::Chinese, Subject::Math, Subject::English]),
        };

        let points = project(&sittings, &decision, &Catalog::default());
        assert!(!points[0].is_virtual);
        assert_eq!(points[0].display_total, 765.0);
    }

    #[test]
    fn core_size_follows_compulsory_list() {
        let early = exam("G10 midterm", 1, &ALL_NINE, Some(765.0));
        let sittings = vec![Sitting::from_record(&early)];
        let catalog = Catalog {
            compulsory: vec![Subject::Chinese, Subject::Math],
            ..Catalog::default()
        };
        let decision = PhaseDecision {
            phase: Phase::Focused,
            core: CoreSubjects::new(vec![
                Subject::Chinese,
                Subject::Math,
                Subject::Physics,
                Subject::Chemistry,
                Subject::Biology,
            ]),
        };

        let points = project(&sittings, &decision, &catalog);
        assert!(points[0].is_virtual);
        assert_eq!(points[0].display_total, 455.0);
    }

    #[test]
    fn missing_declared_total_uses_sum_of_scores() {
        let late = exam("G11 monthly", 9, &ALL_NINE[..6], None);
        let sittings = vec![Sitting::from_record(&late)];
        let points = project(&sittings, &science_core(), &Catalog::default());
        assert_eq!(points[0].display_total, 570.0);
        assert!(!points[0].is_virtual);
    }
}
