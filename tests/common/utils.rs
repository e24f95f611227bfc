use std::path::{Path, PathBuf};

pub const COVERAGE_HEADER: &str =
    "GROUP,PACKAGE,CLASS,INSTRUCTION_MISSED,INSTRUCTION_COVERED,BRANCH_MISSED,BRANCH_COVERED";

pub const FULL_TEMPLATE: &str = "<html><body>
<p>Date: {{REPORT_DATE}}</p>
<p>Total: {{TOTAL_TESTS}}</p>
<p>Passed: {{PASSED_TESTS}}</p>
<p>Failed: {{FAILED_TESTS}}</p>
<p>Rate: {{SUCCESS_RATE}}%</p>
<p>Coverage: {{COVERAGE}}%</p>
<table>{{TEST_SUITES}}</table>
<table>{{TEST_DETAILS}}</table>
</body></html>
";

/// A Gradle-style result file with the given counts and `(name, classname, time)` cases.
pub fn junit_file(tests: u32, failures: u32, errors: u32, cases: &[(&str, &str, &str)]) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"suite\" tests=\"{}\" skipped=\"0\" failures=\"{}\" errors=\"{}\" time=\"1.0\">\n",
        tests, failures, errors
    );
    for (name, classname, time) in cases {
        xml.push_str(&format!(
            "  <testcase name=\"{}\" classname=\"{}\" time=\"{}\"/>\n",
            name, classname, time
        ));
    }
    xml.push_str("</testsuite>\n");
    xml
}

/// A coverage CSV with one data row per `(missed, covered)` pair.
pub fn coverage_csv(rows: &[(u64, u64)]) -> String {
    let mut csv = format!("{}\n", COVERAGE_HEADER);
    for (i, (missed, covered)) in rows.iter().enumerate() {
        csv.push_str(&format!("app,com.acme,Class{},{},{},0,0\n", i, missed, covered));
    }
    csv
}

pub fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
