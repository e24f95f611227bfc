use crate::aggregate::aggregate_model::AggregateReport;

// ============================================================================
// Console summary — formatted terminal output after a run
// ============================================================================

const RULE_WIDTH: usize = 60;

/// Format the run summary for terminal output.
///
/// Produces output like:
/// ```text
/// ============================================================
/// Test report: build/reports/test-report.html
/// ============================================================
/// ✓ FooTest        3 tests
/// ✗ BarTest        2 tests
///
/// Results: 4 passed, 1 failed (5 total), 80% success, 72% coverage
/// ============================================================
/// ```
pub fn format_console_summary(report: &AggregateReport, output: Option<&str>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&rule);
    out.push('\n');
    match output {
        Some(path) => out.push_str(&format!("Test report: {}\n", path)),
        None => out.push_str("Test summary\n"),
    }
    out.push_str(&rule);
    out.push('\n');

    let width = report.suites.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (suite, summary) in report.suite_rows() {
        let marker = if summary.all_passed { "\u{2713}" } else { "\u{2717}" };
        let noun = if summary.test_count == 1 { "test" } else { "tests" };
        out.push_str(&format!(
            "{} {:<width$}  {} {}\n",
            marker,
            suite,
            summary.test_count,
            noun,
            width = width
        ));
    }
    if !report.suites.is_empty() {
        out.push('\n');
    }

    let totals = &report.totals;
    out.push_str(&format!(
        "Results: {} passed, {} failed ({} total), {}% success, {}% coverage\n",
        totals.passed_tests(),
        totals.failed_tests,
        totals.total_tests,
        totals.success_rate_percent(),
        report.coverage.coverage_percent()
    ));
    out.push_str(&rule);
    out.push('\n');

    out
}
