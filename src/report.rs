use std::fmt::Write;

use crate::models::AnalysisReport;

fn rank_text(rank: Option<u32>) -> String {
    rank.map(|r| format!("#{r}")).unwrap_or_else(|| "-".to_string())
}

pub fn build_report(student: Option<&str>, report: &AnalysisReport) -> String {
    let overview = &report.overview;
    let charts = &report.charts;

    let mut output = String::new();
    let student_label = student.unwrap_or("current student");

    let _ = writeln!(output, "# Exam Performance Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} exams, phase {})",
        student_label,
        overview.exam_count,
        overview.phase.label()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(
        output,
        "- Latest total: {} / {}",
        overview.latest_total, overview.max_possible
    );
    let _ = writeln!(
        output,
        "- Best subject: {}",
        overview.best_subject.as_deref().unwrap_or("n/a")
    );
    let _ = writeln!(
        output,
        "- Least stable subject: {}",
        overview.most_unstable.as_deref().unwrap_or("n/a")
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Performance Timeline");
    for point in &charts.timeline {
        let _ = writeln!(
            output,
            "- {} {}: total {}, grade rank {}{}",
            point.date,
            point.exam_name,
            point.display_total,
            rank_text(point.grade_rank),
            if point.is_virtual { " (projected)" } else { "" }
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Short Stave");
    if charts.weakness.is_empty() {
        let _ = writeln!(output, "No relevant subjects in the latest exam.");
    } else {
        for row in &charts.weakness {
            let _ = writeln!(
                output,
                "- {}: {} ({:+.1} vs cohort){}",
                row.label,
                row.score,
                row.gap,
                if row.is_weak { " weak" } else { "" }
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Capability Radar");
    for point in &charts.capability {
        let _ = writeln!(output, "- {}: {}/{}", point.label, point.value, point.full_mark);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Stability");
    for row in &charts.stability {
        let _ = writeln!(
            output,
            "- {}: mean {}, std dev {:.1}, range {}-{} across {} exams",
            row.label, row.mean, row.std_dev, row.min, row.max, row.samples
        );
    }

    if !charts.recommendations.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Combination Suggestions");
        for (i, suggestion) in charts.recommendations.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. {} projected {} ({})",
                i + 1,
                suggestion.name,
                suggestion.total,
                suggestion.subjects.join(", ")
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::sample;

    #[test]
    fn focused_report_marks_projected_points() {
        let snapshot = sample::history().unwrap();
        let report = analyze(&snapshot.exams, snapshot.selected_subjects.as_ref()).unwrap();

        let text = build_report(Some("Avery Lee"), &report);

        assert!(text.starts_with("# Exam Performance Report"));
        assert!(text.contains("Generated for Avery Lee (8 exams, phase FOCUS (G11/12))"));
        assert_eq!(text.matches("(projected)").count(), 3);
        assert!(!text.contains("## Combination Suggestions"));
    }

    #[test]
    fn exploratory_report_lists_suggestions() {
        let mut snapshot = sample::history().unwrap();
        snapshot.exams.truncate(3);
        let report = analyze(&snapshot.exams, None).unwrap();

        let text = build_report(None, &report);
        assert!(text.contains("current student"));
        assert!(text.contains("## Combination Suggestions"));
        assert!(text.contains("1. "));
        assert!(text.contains("3. "));
    }
}
