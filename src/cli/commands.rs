use crate::cli::config::{AppConfig, ArtifactArgs, build_report_config};
use crate::report::console::format_console_summary;
use crate::{ReportError, collect, generate_report};

// ============================================================================
// generate subcommand
// ============================================================================

/// Render the report and print the summary. Failing tests are reported, not
/// treated as an error.
pub fn cmd_generate(
    artifacts: &ArtifactArgs,
    template: Option<std::path::PathBuf>,
    output: Option<std::path::PathBuf>,
    date: Option<String>,
    json_summary: Option<std::path::PathBuf>,
    config: &AppConfig,
) -> Result<(), ReportError> {
    let report_config = build_report_config(artifacts, template, output, date, json_summary, config);
    let outcome = generate_report(&report_config)?;

    let output_path = outcome.output_path.display().to_string();
    print!("{}", format_console_summary(&outcome.report, Some(&output_path)));

    Ok(())
}

// ============================================================================
// summary subcommand
// ============================================================================

/// Aggregate and print the summary only.
pub fn cmd_summary(artifacts: &ArtifactArgs, config: &AppConfig) {
    let resolved = build_report_config(artifacts, None, None, None, None, config);
    let report = collect(
        &resolved.results_dir,
        &resolved.extension,
        &resolved.coverage_path,
        resolved.attribution,
    );

    print!("{}", format_console_summary(&report, None));
}

// ============================================================================
// Helpers
// ============================================================================

/// Install the tracing subscriber. `RUST_LOG` wins over the verbosity flag.
pub fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // try_init: a subscriber may already be installed when embedded or under test
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
