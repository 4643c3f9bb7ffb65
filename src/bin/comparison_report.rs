use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use transcript_compare::{
    aggregate_reports, BatchReport, CaseReport, ComparisonConfig, ComparisonEngineBuilder, Meta,
    SCHEMA_VERSION,
};

const REPORTS_DIR: &str = "target/comparison_reports";

#[derive(Debug, Parser)]
#[command(name = "comparison_report")]
#[command(about = "Score reference/candidate transcript pairs and write a JSON report")]
struct Args {
    #[arg(
        long,
        env = "TRANSCRIPT_COMPARE_CASES_FILE",
        default_value = "test-data/comparisons/reference.json"
    )]
    cases_file: PathBuf,
    #[arg(long, env = "TRANSCRIPT_COMPARE_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "TRANSCRIPT_COMPARE_OUT")]
    out: Option<PathBuf>,
    #[arg(long, env = "TRANSCRIPT_COMPARE_LIMIT")]
    limit: Option<usize>,
    #[arg(long, env = "TRANSCRIPT_COMPARE_OFFSET", default_value_t = 0)]
    offset: usize,
    /// Reproduce the historical pronunciation scaling regardless of config.
    #[arg(long, env = "TRANSCRIPT_COMPARE_LEGACY_SCALING", default_value_t = false)]
    legacy_pronunciation_scaling: bool,
    #[arg(long, env = "TRANSCRIPT_COMPARE_LOG", default_value = "warn")]
    log_filter: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Case {
    id: String,
    reference: String,
    candidate: String,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cases_path = args.cases_file.as_path();
    let out_path = args.out.clone().unwrap_or_else(default_out_path);

    let mut config = match &args.config {
        Some(path) => ComparisonConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => ComparisonConfig::default(),
    };
    if args.legacy_pronunciation_scaling {
        config.scoring.legacy_pronunciation_scaling = true;
    }
    let legacy_pronunciation_scaling = config.scoring.legacy_pronunciation_scaling;

    let engine = ComparisonEngineBuilder::new(config)
        .build()
        .map_err(|err| format!("Failed to build ComparisonEngine: {err}"))?;

    let all_cases = load_cases(cases_path)?;
    let cases: Vec<Case> = all_cases
        .into_iter()
        .skip(args.offset)
        .take(args.limit.unwrap_or(usize::MAX))
        .collect();
    if cases.is_empty() {
        return Err(format!(
            "No cases selected from '{}' (offset {}, limit {:?}).",
            cases_path.display(),
            args.offset,
            args.limit
        ));
    }

    let progress = ProgressBar::new(cases.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message("starting...");

    let mut case_reports = Vec::with_capacity(cases.len());
    for case in cases {
        progress.set_message(case.id.clone());
        let report = engine.compare(&case.reference, &case.candidate);
        case_reports.push(CaseReport {
            id: case.id,
            reference: case.reference,
            candidate: case.candidate,
            report,
        });
        progress.inc(1);
    }
    progress.finish_with_message("comparison pass complete");

    let aggregates = aggregate_reports(&case_reports);
    let report = BatchReport {
        schema_version: SCHEMA_VERSION,
        meta: Meta {
            generated_at: Utc::now().to_rfc3339(),
            case_count: case_reports.len(),
            legacy_pronunciation_scaling,
        },
        cases: case_reports,
        aggregates,
    };
    write_batch_report(&out_path, &report)?;
    info!(
        cases = report.meta.case_count,
        scored = report.aggregates.counts.scored,
        path = %out_path.display(),
        "comparison report written"
    );
    println!("report written to {}", out_path.display());
    Ok(())
}

fn load_cases(path: &Path) -> Result<Vec<Case>, String> {
    let data = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read cases file '{}': {err}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|err| format!("Failed to parse cases file '{}': {err}", path.display()))
}

fn default_out_path() -> PathBuf {
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
    Path::new(REPORTS_DIR).join(format!("comparison-report-{stamp}.json"))
}

/// Pretty JSON with a trailing newline; the report directory is created on demand.
fn write_batch_report(path: &Path, report: &BatchReport) -> Result<(), String> {
    let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = dir {
        fs::create_dir_all(dir)
            .map_err(|err| format!("Cannot create report directory {}: {err}", dir.display()))?;
    }
    let file = File::create(path)
        .map_err(|err| format!("Cannot open {} for writing: {err}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .map_err(|err| format!("Cannot encode comparison report: {err}"))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .map_err(|err| format!("Cannot write {}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_report_is_written_as_pretty_json() {
        let dir = std::env::temp_dir().join(format!("comparison-report-{}", std::process::id()));
        let path = dir.join("nested").join("report.json");
        let report = BatchReport {
            schema_version: SCHEMA_VERSION,
            meta: Meta {
                generated_at: "2026-01-01T00:00:00+00:00".to_string(),
                case_count: 0,
                legacy_pronunciation_scaling: false,
            },
            cases: Vec::new(),
            aggregates: aggregate_reports(&[]),
        };

        write_batch_report(&path, &report).expect("report written");
        let written = fs::read_to_string(&path).expect("report readable");
        assert!(written.ends_with("}\n"));
        let json: serde_json::Value = serde_json::from_str(&written).expect("valid json");
        assert_eq!(json["schema_version"], SCHEMA_VERSION);
        assert_eq!(json["aggregates"]["counts"]["total"], 0);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn default_out_path_is_under_reports_dir() {
        let path = default_out_path();
        assert!(path.starts_with(REPORTS_DIR));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
    }
}
