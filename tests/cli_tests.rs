//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn exam_insight() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("exam-insight").unwrap()
}

fn write_sample(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("history.json");
    exam_insight()
        .arg("sample")
        .arg("--out")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample history written to"));
    path
}

#[test]
fn sample_then_analyze_json() {
    let dir = TempDir::new().unwrap();
    let history = write_sample(&dir);

    exam_insight()
        .arg("analyze")
        .arg("--input")
        .arg(&history)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"phase\": \"FOCUSED\""))
        .stdout(predicate::str::contains("\"isVirtual\": true"))
        .stdout(predicate::str::contains("\"recommendations\": []"));
}

#[test]
fn analyze_markdown_to_file() {
    let dir = TempDir::new().unwrap();
    let history = write_sample(&dir);
    let out = dir.path().join("report.md");

    exam_insight()
        .arg("analyze")
        .arg("--input")
        .arg(&history)
        .arg("--format")
        .arg("markdown")
        .arg("--student")
        .arg("Avery Lee")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let report = std::fs::read_to_string(&out).unwrap();
    assert!(report.contains("# Exam Performance Report"));
    assert!(report.contains("Avery Lee"));
    assert!(report.contains("(projected)"));
}

#[test]
fn selection_flag_overrides_payload() {
    let dir = TempDir::new().unwrap();
    let history = write_sample(&dir);

    // An unusable selection removes the core set, so nothing is projected.
    exam_insight()
        .arg("analyze")
        .arg("--input")
        .arg(&history)
        .arg("--selection")
        .arg("Physics")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"isVirtual\": true").not());
}

#[test]
fn analyze_csv_discovery_history() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.csv");
    std::fs::write(
        &path,
        "\
exam_name,date,exam_type,total_score,class_rank,grade_rank,subject,score,max_score,grade_avg_score,subject_class_rank,subject_grade_rank
G10 Final,2023-06-30,Grade10,,,88,Chinese,110,150,98,,
G10 Final,2023-06-30,Grade10,,,88,Math,120,150,98,,
G10 Final,2023-06-30,Grade10,,,88,English,115,150,98,,
G10 Final,2023-06-30,Grade10,,,88,Physics,80,100,70,,
G10 Final,2023-06-30,Grade10,,,88,Chemistry,75,100,68,,
G10 Final,2023-06-30,Grade10,,,88,Biology,70,100,65,,
G10 Final,2023-06-30,Grade10,,,88,History,60,100,55,,
G10 Final,2023-06-30,Grade10,,,88,Politics,65,100,60,,
G10 Final,2023-06-30,Grade10,,,88,Geography,70,100,65,,
",
    )
    .unwrap();

    exam_insight()
        .arg("analyze")
        .arg("--input")
        .arg(&path)
        .arg("--format")
        .arg("markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("phase DISCOVERY (G10)"))
        .stdout(predicate::str::contains("## Combination Suggestions"))
        .stdout(predicate::str::contains("1. 物化生 (Pure Science) projected 570"));
}

#[test]
fn empty_history_reports_no_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.json");
    std::fs::write(&path, "[]").unwrap();

    exam_insight()
        .arg("analyze")
        .arg("--input")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No exam records found."));
}

#[test]
fn validate_reports_counts() {
    let dir = TempDir::new().unwrap();
    let history = write_sample(&dir);

    exam_insight()
        .arg("validate")
        .arg("--input")
        .arg(&history)
        .assert()
        .success()
        .stdout(predicate::str::contains("8 exams with 57 subject scores are valid."));
}

#[test]
fn validate_rejects_duplicate_subject() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dup.json");
    std::fs::write(
        &path,
        r#"{"name": "Dup", "date": "2024-01-01", "scores": [
            {"subject": "Math", "score": 100}, {"subject": "Math", "score": 90}]}"#,
    )
    .unwrap();

    exam_insight()
        .arg("validate")
        .arg("--input")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate subject: Math"));
}

#[test]
fn custom_catalog_is_applied() {
    let dir = TempDir::new().unwrap();
    let history = write_sample(&dir);
    let catalog = dir.path().join("catalog.toml");
    std::fs::write(
        &catalog,
        r#"
exploratory_threshold = 5

[labels]
Physics = "Physics"

[[combinations]]
name = "Sciences"
subjects = ["Physics", "Chemistry", "Biology"]
"#,
    )
    .unwrap();

    exam_insight()
        .arg("analyze")
        .arg("--input")
        .arg(&history)
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"phase\": \"EXPLORATORY\""))
        .stdout(predicate::str::contains("\"name\": \"Sciences\""));
}

#[test]
fn invalid_catalog_fails() {
    let dir = TempDir::new().unwrap();
    let catalog = dir.path().join("catalog.toml");
    std::fs::write(&catalog, "recommendation_limit = 0\n").unwrap();

    exam_insight()
        .arg("catalog")
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("recommendation_limit must be at least 1"));
}

#[test]
fn catalog_prints_defaults() {
    exam_insight()
        .arg("catalog")
        .env_remove("EXAM_INSIGHT_CATALOG")
        .assert()
        .success()
        .stdout(predicate::str::contains("exploratory_threshold = 6"))
        .stdout(predicate::str::contains("Pure Science"));
}
