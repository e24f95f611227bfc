use tracing::debug;

use crate::aggregate::aggregate_model::CoverageSummary;

// ============================================================================
// Coverage export (JaCoCo-style CSV) folding
// ============================================================================

const MIN_COLUMNS: usize = 5;
const MISSED_COLUMN: usize = 3;
const COVERED_COLUMN: usize = 4;

/// Sum instruction counts over every data row of a coverage CSV.
///
/// The first line is a header. Rows with fewer than five fields are skipped;
/// a missed/covered field that is not a non-negative integer counts as 0, so
/// a negative count such as `-5` contributes nothing. Sums saturate at
/// `u64::MAX`.
pub fn parse_coverage_csv(content: &str) -> CoverageSummary {
    content
        .lines()
        .enumerate()
        .skip(1)
        .filter_map(|(line_no, line)| parse_row(line_no + 1, line))
        .fold(CoverageSummary::default(), CoverageSummary::merge)
}

/// Coverage for an optional export; absent content means 0%.
pub fn coverage_from(content: Option<&str>) -> CoverageSummary {
    content.map(parse_coverage_csv).unwrap_or_default()
}

fn parse_row(line_no: usize, line: &str) -> Option<CoverageSummary> {
    let cols: Vec<&str> = line.split(',').collect();
    if cols.len() < MIN_COLUMNS {
        debug!("coverage line {} has {} fields, skipping", line_no, cols.len());
        return None;
    }

    let missed = parse_field(line_no, cols[MISSED_COLUMN]);
    let covered = parse_field(line_no, cols[COVERED_COLUMN]);
    Some(CoverageSummary {
        total_instructions: missed.saturating_add(covered),
        covered_instructions: covered,
    })
}

fn parse_field(line_no: usize, field: &str) -> u64 {
    field.trim().parse().unwrap_or_else(|_| {
        debug!("coverage line {}: non-numeric field {:?}, counting as 0", line_no, field);
        0
    })
}
