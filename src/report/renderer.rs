use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::aggregate::aggregate_model::{
    AggregateReport, CoverageSummary, RunTotals, SuiteSummary, TestCaseRecord,
};

// ============================================================================
// Template renderer — fixed placeholder substitution into an HTML template
// ============================================================================

pub const REPORT_DATE: &str = "{{REPORT_DATE}}";
pub const TOTAL_TESTS: &str = "{{TOTAL_TESTS}}";
pub const PASSED_TESTS: &str = "{{PASSED_TESTS}}";
pub const FAILED_TESTS: &str = "{{FAILED_TESTS}}";
pub const SUCCESS_RATE: &str = "{{SUCCESS_RATE}}";
pub const COVERAGE: &str = "{{COVERAGE}}";
pub const TEST_SUITES: &str = "{{TEST_SUITES}}";
pub const TEST_DETAILS: &str = "{{TEST_DETAILS}}";

/// Every placeholder the renderer fills in.
pub const PLACEHOLDERS: [&str; 8] = [
    REPORT_DATE,
    TOTAL_TESTS,
    PASSED_TESTS,
    FAILED_TESTS,
    SUCCESS_RATE,
    COVERAGE,
    TEST_SUITES,
    TEST_DETAILS,
];

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[A-Z_]+\}\}").expect("token pattern is valid"));

/// Text used inside the generated table rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderLabels {
    pub passed: String,
    pub failed: String,
    pub no_suites: String,
    pub no_details: String,
}

impl Default for RenderLabels {
    fn default() -> Self {
        Self {
            passed: "Passed".to_string(),
            failed: "Failed".to_string(),
            no_suites: "No test suites".to_string(),
            no_details: "No test details".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Value substituted for `{{REPORT_DATE}}`
    pub report_date: String,
    pub labels: RenderLabels,
}

/// Render `template` by replacing every known placeholder at every occurrence.
///
/// Substitution is a single pass over the template, so text coming from the
/// result files is never itself treated as a placeholder. Unknown `{{...}}`
/// tokens are left as they are.
pub fn render<'a>(
    template: &str,
    totals: &RunTotals,
    coverage: &CoverageSummary,
    suite_rows: impl IntoIterator<Item = (&'a str, &'a SuiteSummary)>,
    case_rows: &[TestCaseRecord],
    options: &RenderOptions,
) -> String {
    let suites_html = suite_rows_html(suite_rows, &options.labels);
    let details_html = case_rows_html(case_rows, &options.labels);

    TOKEN_RE
        .replace_all(template, |caps: &Captures| {
            let token = &caps[0];
            match token {
                REPORT_DATE => options.report_date.clone(),
                TOTAL_TESTS => totals.total_tests.to_string(),
                PASSED_TESTS => totals.passed_tests().to_string(),
                FAILED_TESTS => totals.failed_tests.to_string(),
                SUCCESS_RATE => totals.success_rate_percent().to_string(),
                COVERAGE => coverage.coverage_percent().to_string(),
                TEST_SUITES => suites_html.clone(),
                TEST_DETAILS => details_html.clone(),
                _ => token.to_string(),
            }
        })
        .into_owned()
}

/// Render a whole aggregate; suites come out sorted by name.
pub fn render_report(template: &str, report: &AggregateReport, options: &RenderOptions) -> String {
    render(
        template,
        &report.totals,
        &report.coverage,
        report.suite_rows(),
        &report.cases,
        options,
    )
}

/// `<tr>` rows for the suite table, or a single "no data" row.
pub fn suite_rows_html<'a>(
    rows: impl IntoIterator<Item = (&'a str, &'a SuiteSummary)>,
    labels: &RenderLabels,
) -> String {
    let mut html = String::new();
    for (suite, summary) in rows {
        html.push_str(&format!(
            "<tr>\n  <td>{name}</td>\n  <td>{count}</td>\n  <td>{badge}</td>\n</tr>\n",
            name = escape_html(suite),
            count = summary.test_count,
            badge = status_badge(summary.all_passed, labels),
        ));
    }

    if html.is_empty() {
        empty_row(&labels.no_suites)
    } else {
        html
    }
}

/// `<tr>` rows for the test details table, or a single "no data" row.
pub fn case_rows_html(rows: &[TestCaseRecord], labels: &RenderLabels) -> String {
    if rows.is_empty() {
        return empty_row(&labels.no_details);
    }

    let mut html = String::new();
    for case in rows {
        html.push_str(&format!(
            "<tr>\n  <td>{name}</td>\n  <td><span class=\"duration\">{time}s</span></td>\n  <td>{badge}</td>\n</tr>\n",
            name = escape_html(&case.name),
            time = escape_html(&case.duration_seconds),
            badge = status_badge(!case.failed, labels),
        ));
    }
    html
}

fn status_badge(passed: bool, labels: &RenderLabels) -> String {
    let (class, text) = if passed {
        ("passed", &labels.passed)
    } else {
        ("failed", &labels.failed)
    };
    format!(
        "<span class=\"status-badge {}\">{}</span>",
        class,
        escape_html(text)
    )
}

fn empty_row(text: &str) -> String {
    format!("<tr><td colspan=\"3\">{}</td></tr>\n", escape_html(text))
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
