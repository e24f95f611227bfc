use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    aggregate::{
        aggregate_model::{AggregateReport, SummaryView},
        aggregator::{FailureAttribution, aggregate},
    },
    report::renderer::{RenderLabels, RenderOptions, render_report},
    scan::scanner::{read_coverage, scan_results},
};

pub mod aggregate;
pub mod cli;
pub mod error;
pub mod report;
pub mod scan;

pub use error::ReportError;

/// Everything one report run needs, fully resolved.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub results_dir: PathBuf,
    pub extension: String,
    pub coverage_path: PathBuf,
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub attribution: FailureAttribution,
    pub report_date: String,
    pub labels: RenderLabels,
    pub json_summary: Option<PathBuf>,
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub report: AggregateReport,
    pub output_path: PathBuf,
}

/// Scan and aggregate only. Never fails: missing inputs give an empty report.
pub fn collect(
    results_dir: &Path,
    extension: &str,
    coverage_path: &Path,
    attribution: FailureAttribution,
) -> AggregateReport {
    let coverage = read_coverage(coverage_path);
    let results = scan_results(results_dir, extension).map(|file| file.content);
    aggregate(results, coverage.as_deref(), attribution)
}

/// Run the whole pipeline: scan → aggregate → render → write.
///
/// The template is checked first; it is the only input whose absence aborts
/// the run.
pub fn generate_report(config: &ReportConfig) -> Result<ReportOutcome, ReportError> {
    let template = load_template(&config.template_path)?;

    let report = collect(
        &config.results_dir,
        &config.extension,
        &config.coverage_path,
        config.attribution,
    );

    let options = RenderOptions {
        report_date: config.report_date.clone(),
        labels: config.labels.clone(),
    };
    let html = render_report(&template, &report, &options);
    write_output(&config.output_path, &html)?;
    info!("wrote report to {}", config.output_path.display());

    if let Some(path) = &config.json_summary {
        let json = serde_json::to_string_pretty(&SummaryView::from(&report))?;
        write_output(path, &json)?;
        info!("wrote JSON summary to {}", path.display());
    }

    Ok(ReportOutcome {
        report,
        output_path: config.output_path.clone(),
    })
}

fn load_template(path: &Path) -> Result<String, ReportError> {
    if !path.is_file() {
        return Err(ReportError::MissingTemplate {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))
}

/// Write `content` to `path`, creating parent directories and replacing any existing file.
fn write_output(path: &Path, content: &str) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| ReportError::io(path, e))
}
