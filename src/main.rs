use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use exam_insight::{ingest, report, sample, Analyzer, Catalog, RawSelection};

#[derive(Parser)]
#[command(name = "exam-insight")]
#[command(about = "Exam history performance analysis for Group Scholar", long_about = None)]
struct Cli {
    /// Log debug detail to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an exam history (JSON payload or CSV export)
    Analyze {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Elective selection, e.g. "Physics,Chemistry,Biology"; overrides the payload
        #[arg(long)]
        selection: Option<String>,
        #[arg(long, env = "EXAM_INSIGHT_CATALOG")]
        catalog: Option<PathBuf>,
        /// Student name used in the markdown heading
        #[arg(long)]
        student: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Validate an exam history without analyzing it
    Validate {
        #[arg(long)]
        input: PathBuf,
    },
    /// Write a reproducible sample history as JSON
    Sample {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the effective subject catalog as TOML
    Catalog {
        #[arg(long, env = "EXAM_INSIGHT_CATALOG")]
        catalog: Option<PathBuf>,
    },
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    match path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog from {}", path.display())),
        None => Ok(Catalog::default()),
    }
}

fn emit(out: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}.", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_directive = if cli.verbose {
        "exam_insight=debug"
    } else {
        "exam_insight=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            input,
            format,
            selection,
            catalog,
            student,
            out,
        } => {
            let catalog = load_catalog(catalog.as_deref())?;
            let snapshot = ingest::load_path(&input)
                .with_context(|| format!("failed to load {}", input.display()))?;
            let selection = selection
                .map(RawSelection::Text)
                .or(snapshot.selected_subjects);

            let analyzer = Analyzer::new(catalog);
            let Some(analysis) = analyzer.analyze(&snapshot.exams, selection.as_ref()) else {
                println!("No exam records found.");
                return Ok(());
            };

            let content = match format {
                OutputFormat::Json => {
                    let mut json = serde_json::to_string_pretty(&analysis)?;
                    json.push('\n');
                    json
                }
                OutputFormat::Markdown => report::build_report(student.as_deref(), &analysis),
            };
            emit(out.as_deref(), &content)?;
        }
        Commands::Validate { input } => {
            let snapshot = ingest::load_path(&input)
                .with_context(|| format!("failed to load {}", input.display()))?;
            let scores: usize = snapshot.exams.iter().map(|e| e.scores.len()).sum();
            println!(
                "{} exams with {} subject scores are valid.",
                snapshot.exams.len(),
                scores
            );
        }
        Commands::Sample { out } => {
            let snapshot = sample::history()?;
            let mut json = serde_json::to_string_pretty(&snapshot)?;
            json.push('\n');
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Sample history written to {}.", path.display());
                }
                None => print!("{json}"),
            }
        }
        Commands::Catalog { catalog } => {
            let catalog = load_catalog(catalog.as_deref())?;
            print!("{}", catalog.to_toml_string()?);
        }
    }

    Ok(())
}
