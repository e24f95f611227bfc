use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::aggregate_model::{AggregateReport, RunTotals, SuiteSummary, TestCaseRecord};
use crate::aggregate::coverage::coverage_from;
use crate::aggregate::junit_parser::{ParsedResultFile, parse_result_file};

// ============================================================================
// Aggregation — a pure fold of per-file partial reports
// ============================================================================

/// How a test case row gets its failed flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailureAttribution {
    /// Every case in a file reporting any failure or error is failed.
    #[default]
    File,

    /// A case is failed only if its own element carries failure markup.
    Case,
}

/// Aggregate raw result texts and optional coverage text into a report.
///
/// Each file is reduced to a partial report on its own and the partials are
/// merged in iteration order, so case rows keep file order then in-file order.
pub fn aggregate<I, S>(
    raw_results: I,
    raw_coverage: Option<&str>,
    attribution: FailureAttribution,
) -> AggregateReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = raw_results
        .into_iter()
        .map(|raw| aggregate_file(raw.as_ref(), attribution))
        .fold(AggregateReport::default(), AggregateReport::merge);

    report.coverage = coverage_from(raw_coverage);

    debug!(
        "aggregated {} tests ({} failed) across {} suites, coverage {}%",
        report.totals.total_tests,
        report.totals.failed_tests,
        report.suites.len(),
        report.coverage.coverage_percent()
    );
    report
}

/// Partial report for a single result file.
pub fn aggregate_file(raw: &str, attribution: FailureAttribution) -> AggregateReport {
    partial_from_parsed(parse_result_file(raw), attribution)
}

fn partial_from_parsed(parsed: ParsedResultFile, attribution: FailureAttribution) -> AggregateReport {
    let file_failed = parsed.has_failures();
    let mut partial = AggregateReport {
        totals: RunTotals::new(parsed.tests, parsed.failed()),
        ..AggregateReport::default()
    };

    for case in parsed.cases {
        let failed = match attribution {
            FailureAttribution::File => file_failed,
            FailureAttribution::Case => case.has_failure_markup,
        };
        let owner_suite = suite_key(&case.classname).to_string();

        partial
            .suites
            .entry(owner_suite.clone())
            .or_insert_with(SuiteSummary::default)
            .record(failed);

        partial.cases.push(TestCaseRecord {
            name: case.name,
            owner_suite,
            duration_seconds: case.time,
            failed,
        });
    }

    partial
}

/// Last dot-delimited segment of a qualified class name: `com.acme.Foo` → `Foo`.
pub fn suite_key(classname: &str) -> &str {
    classname.rsplit_once('.').map_or(classname, |(_, last)| last)
}
