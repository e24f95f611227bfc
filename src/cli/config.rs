use std::fmt::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ReportConfig;
use crate::aggregate::aggregator::FailureAttribution;
use crate::report::renderer::RenderLabels;

pub const DEFAULT_CONFIG_FILE: &str = "test-report.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "test-report",
    version,
    about = "Aggregate JUnit XML results and coverage into an HTML test report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to config file (default: test-report.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the HTML report from result files, coverage and a template
    Generate {
        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// HTML template containing the {{...}} placeholders
        #[arg(long)]
        template: Option<PathBuf>,

        /// Where to write the rendered report (overwritten)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fixed value for {{REPORT_DATE}} instead of today's date
        #[arg(long)]
        date: Option<String>,

        /// Also write the aggregate as JSON to this path
        #[arg(long)]
        json_summary: Option<PathBuf>,
    },

    /// Print the aggregated summary without rendering a template
    Summary {
        #[command(flatten)]
        artifacts: ArtifactArgs,
    },
}

/// Inputs shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ArtifactArgs {
    /// Directory holding the JUnit XML result files
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Result file extension (case-sensitive)
    #[arg(long)]
    pub extension: Option<String>,

    /// Coverage CSV export
    #[arg(long)]
    pub coverage: Option<PathBuf>,

    /// How failed cases are detected: file or case
    #[arg(long, value_enum)]
    pub attribution: Option<FailureAttribution>,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `test-report.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub report: ReportSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default = "default_coverage")]
    pub coverage: PathBuf,

    #[serde(default = "default_template")]
    pub template: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            extension: default_extension(),
            coverage: default_coverage(),
            template: default_template(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default)]
    pub attribution: FailureAttribution,

    /// chrono format string for {{REPORT_DATE}}
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub labels: RenderLabels,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            attribution: FailureAttribution::default(),
            date_format: default_date_format(),
            labels: RenderLabels::default(),
        }
    }
}

// Serde default helpers
fn default_results_dir() -> PathBuf { PathBuf::from("build/test-results/test") }
fn default_extension() -> String { "xml".to_string() }
fn default_coverage() -> PathBuf { PathBuf::from("build/reports/jacoco/test/jacocoTestReport.csv") }
fn default_template() -> PathBuf { PathBuf::from("src/test/resources/test-report-template.html") }
fn default_output() -> PathBuf { PathBuf::from("build/reports/test-report.html") }
fn default_date_format() -> String { "%Y-%m-%d".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!("ignoring malformed config {}: {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => {
            debug!("no config file at {}, using defaults", config_path);
            AppConfig::default()
        }
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Resolve a full report configuration: CLI > config file > defaults.
///
/// `date` overrides the formatted current date, which keeps output
/// reproducible when set.
pub fn build_report_config(
    artifacts: &ArtifactArgs,
    template: Option<PathBuf>,
    output: Option<PathBuf>,
    date: Option<String>,
    json_summary: Option<PathBuf>,
    config: &AppConfig,
) -> ReportConfig {
    let report_date = date.unwrap_or_else(|| today(&config.report.date_format));

    ReportConfig {
        results_dir: artifacts
            .results_dir
            .clone()
            .unwrap_or_else(|| config.paths.results_dir.clone()),
        extension: artifacts
            .extension
            .clone()
            .unwrap_or_else(|| config.paths.extension.clone()),
        coverage_path: artifacts
            .coverage
            .clone()
            .unwrap_or_else(|| config.paths.coverage.clone()),
        template_path: template.unwrap_or_else(|| config.paths.template.clone()),
        output_path: output.unwrap_or_else(|| config.paths.output.clone()),
        attribution: artifacts.attribution.unwrap_or(config.report.attribution),
        report_date,
        labels: config.report.labels.clone(),
        json_summary,
    }
}

/// Today's local date in `format`, falling back to ISO dates for a bad format string.
pub fn today(format: &str) -> String {
    let now = chrono::Local::now();
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_err() {
        warn!("invalid date format {:?}, using {}", format, default_date_format());
        return now.format(&default_date_format()).to_string();
    }
    out
}
