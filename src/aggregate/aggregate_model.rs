use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Aggregate model — everything one report run computes
// ============================================================================

/// One executed test case, as shown in the details table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseRecord {
    /// Display name of the test
    pub name: String,

    /// Last dotted segment of the qualifying class name
    pub owner_suite: String,

    /// Duration exactly as written in the result file
    pub duration_seconds: String,

    /// Whether the case is displayed as failed
    pub failed: bool,
}

/// Per-suite rollup, keyed by suite name in [`AggregateReport::suites`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub test_count: u64,
    pub all_passed: bool,
}

impl Default for SuiteSummary {
    fn default() -> Self {
        Self {
            test_count: 0,
            all_passed: true,
        }
    }
}

impl SuiteSummary {
    /// Fold one case into the summary.
    pub fn record(&mut self, failed: bool) {
        self.test_count = self.test_count.saturating_add(1);
        self.all_passed = self.all_passed && !failed;
    }

    /// Combine two summaries of the same suite.
    pub fn merge(self, other: SuiteSummary) -> SuiteSummary {
        SuiteSummary {
            test_count: self.test_count.saturating_add(other.test_count),
            all_passed: self.all_passed && other.all_passed,
        }
    }
}

/// Instruction coverage summed over every data row of the coverage export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub total_instructions: u64,
    pub covered_instructions: u64,
}

impl CoverageSummary {
    /// `floor(covered * 100 / total)`, or 0 when nothing was counted.
    pub fn coverage_percent(&self) -> u64 {
        if self.total_instructions == 0 {
            0
        } else {
            (u128::from(self.covered_instructions) * 100 / u128::from(self.total_instructions)) as u64
        }
    }

    pub fn merge(self, other: CoverageSummary) -> CoverageSummary {
        CoverageSummary {
            total_instructions: self
                .total_instructions
                .saturating_add(other.total_instructions),
            covered_instructions: self
                .covered_instructions
                .saturating_add(other.covered_instructions),
        }
    }
}

/// Run-wide test counts.
///
/// Only the total and failed counts are stored; passed count and success
/// rate are derived so they can never disagree with them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub total_tests: u64,
    pub failed_tests: u64,
}

impl RunTotals {
    pub fn new(total_tests: u64, failed_tests: u64) -> Self {
        Self {
            total_tests,
            failed_tests,
        }
    }

    /// `total - failed`, clamped at zero for result files that report more
    /// failures than tests.
    pub fn passed_tests(&self) -> u64 {
        self.total_tests.saturating_sub(self.failed_tests)
    }

    /// `floor(passed * 100 / total)`, or 0 when no tests ran.
    pub fn success_rate_percent(&self) -> u64 {
        if self.total_tests == 0 {
            0
        } else {
            (u128::from(self.passed_tests()) * 100 / u128::from(self.total_tests)) as u64
        }
    }

    pub fn merge(self, other: RunTotals) -> RunTotals {
        RunTotals {
            total_tests: self.total_tests.saturating_add(other.total_tests),
            failed_tests: self.failed_tests.saturating_add(other.failed_tests),
        }
    }
}

/// Result of aggregating a whole run, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub totals: RunTotals,

    /// Suite summaries; a `BTreeMap` so iteration is sorted by suite name
    pub suites: BTreeMap<String, SuiteSummary>,

    /// Case rows in file order, then in-file order
    pub cases: Vec<TestCaseRecord>,

    pub coverage: CoverageSummary,
}

impl AggregateReport {
    /// Combine two partial aggregates. Associative, with `default()` as identity.
    pub fn merge(mut self, other: AggregateReport) -> AggregateReport {
        self.totals = self.totals.merge(other.totals);
        for (suite, summary) in other.suites {
            let entry = self.suites.entry(suite).or_default();
            *entry = entry.merge(summary);
        }
        self.cases.extend(other.cases);
        self.coverage = self.coverage.merge(other.coverage);
        self
    }

    /// Suite rows in display order.
    pub fn suite_rows(&self) -> impl Iterator<Item = (&str, &SuiteSummary)> {
        self.suites.iter().map(|(name, summary)| (name.as_str(), summary))
    }
}

/// Flat view of the aggregate written as the optional JSON summary.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView<'a> {
    pub total_tests: u64,
    pub passed_tests: u64,
    pub failed_tests: u64,
    pub success_rate: u64,
    pub coverage: u64,
    pub suites: &'a BTreeMap<String, SuiteSummary>,
    pub cases: &'a [TestCaseRecord],
}

impl<'a> From<&'a AggregateReport> for SummaryView<'a> {
    fn from(report: &'a AggregateReport) -> Self {
        Self {
            total_tests: report.totals.total_tests,
            passed_tests: report.totals.passed_tests(),
            failed_tests: report.totals.failed_tests,
            success_rate: report.totals.success_rate_percent(),
            coverage: report.coverage.coverage_percent(),
            suites: &report.suites,
            cases: &report.cases,
        }
    }
}
