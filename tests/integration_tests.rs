mod common;

use std::path::{Path, PathBuf};

use common::utils::{FULL_TEMPLATE, coverage_csv, junit_file, write};
use test_report::aggregate::aggregator::FailureAttribution;
use test_report::cli::commands::cmd_generate;
use test_report::cli::config::{AppConfig, ArtifactArgs};
use test_report::report::renderer::{PLACEHOLDERS, RenderLabels};
use test_report::scan::scanner::{list_result_paths, read_coverage, scan_results};
use test_report::{ReportConfig, ReportError, collect, generate_report};

fn report_config(root: &Path) -> ReportConfig {
    ReportConfig {
        results_dir: root.join("build/test-results/test"),
        extension: "xml".to_string(),
        coverage_path: root.join("build/reports/jacoco/test/jacocoTestReport.csv"),
        template_path: root.join("src/test/resources/test-report-template.html"),
        output_path: root.join("build/reports/test-report.html"),
        attribution: FailureAttribution::File,
        report_date: "2024-05-01".to_string(),
        labels: RenderLabels::default(),
        json_summary: None,
    }
}

// ============================================================================
// 1. Scanner
// ============================================================================

#[test]
fn scanner_reads_matching_files_in_sorted_order() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "TEST-b.xml", "second");
    write(dir.path(), "TEST-a.xml", "first");
    write(dir.path(), "notes.txt", "ignored");
    write(dir.path(), "UPPER.XML", "ignored, extension is case-sensitive");
    write(dir.path(), "nested/TEST-c.xml", "ignored, not a direct child");

    let contents: Vec<String> = scan_results(dir.path(), "xml").map(|f| f.content).collect();
    assert_eq!(contents, vec!["first", "second"]);
}

#[test]
fn scanner_missing_directory_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    assert_eq!(scan_results(&missing, "xml").count(), 0);
    assert!(list_result_paths(&missing, "xml").is_empty());
}

#[test]
fn scanner_reports_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "TEST-a.xml", "x");
    let files: Vec<PathBuf> = scan_results(dir.path(), "xml").map(|f| f.path).collect();
    assert_eq!(files, vec![path]);
}

#[test]
fn scanner_decodes_invalid_utf8_lossily() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = b"<testsuite tests=\"3\" failures=\"1\" errors=\"0\">\n<testcase name=\"caf".to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(b"\" classname=\"p.Foo\" time=\"0.1\"/>\n</testsuite>\n");
    std::fs::write(dir.path().join("TEST-latin1.xml"), &bytes).unwrap();

    let files: Vec<_> = scan_results(dir.path(), "xml").collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].content.contains("caf\u{FFFD}"));

    let report = collect(
        dir.path(),
        "xml",
        &dir.path().join("missing.csv"),
        FailureAttribution::File,
    );
    assert_eq!(report.totals.total_tests, 3);
    assert_eq!(report.totals.failed_tests, 1);
    assert_eq!(report.cases.len(), 1);
    assert_eq!(report.cases[0].name, "caf\u{FFFD}");
}

#[test]
fn coverage_with_invalid_utf8_is_still_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cov.csv");
    let mut bytes = b"GROUP,PACKAGE,CLASS,INSTRUCTION_MISSED,INSTRUCTION_COVERED\napp,p,Caf".to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(b",1,3\n");
    std::fs::write(&path, &bytes).unwrap();

    let content = read_coverage(&path).unwrap();
    assert!(content.ends_with(",1,3\n"));
}

#[test]
fn coverage_read_only_for_regular_files() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "cov.csv", "header\n");

    assert_eq!(read_coverage(&csv).as_deref(), Some("header\n"));
    assert!(read_coverage(&dir.path().join("missing.csv")).is_none());
    assert!(read_coverage(dir.path()).is_none());
}

// ============================================================================
// 2. Full pipeline
// ============================================================================

#[test]
fn generate_end_to_end() {
    let root = tempfile::tempdir().unwrap();
    let config = report_config(root.path());

    write(
        &config.results_dir,
        "TEST-pkg.Foo.xml",
        &junit_file(2, 1, 0, &[("a", "pkg.Foo", "0.1"), ("b", "pkg.Foo", "0.2")]),
    );
    write(
        &config.results_dir,
        "TEST-pkg.Bar.xml",
        &junit_file(1, 0, 0, &[("c", "pkg.Bar", "0.3")]),
    );
    write(
        config.coverage_path.parent().unwrap(),
        "jacocoTestReport.csv",
        &coverage_csv(&[(1, 9), (0, 10)]),
    );
    write(config.template_path.parent().unwrap(), "test-report-template.html", FULL_TEMPLATE);

    let outcome = generate_report(&config).unwrap();
    assert_eq!(outcome.output_path, config.output_path);
    assert_eq!(outcome.report.totals.total_tests, 3);
    assert_eq!(outcome.report.totals.failed_tests, 1);

    let html = std::fs::read_to_string(&config.output_path).unwrap();
    for token in PLACEHOLDERS {
        assert!(!html.contains(token));
    }
    assert!(html.contains("<p>Date: 2024-05-01</p>"));
    assert!(html.contains("<p>Total: 3</p>"));
    assert!(html.contains("<p>Passed: 2</p>"));
    assert!(html.contains("<p>Rate: 66%</p>"));
    assert!(html.contains("<p>Coverage: 95%</p>"));

    // Bar.xml sorts first, so its case row comes first
    let c = html.find("<td>c</td>").unwrap();
    let a = html.find("<td>a</td>").unwrap();
    assert!(c < a);
}

#[test]
fn generate_with_no_inputs_renders_empty_report() {
    let root = tempfile::tempdir().unwrap();
    let config = report_config(root.path());
    write(config.template_path.parent().unwrap(), "test-report-template.html", FULL_TEMPLATE);

    let outcome = generate_report(&config).unwrap();
    let totals = outcome.report.totals;
    assert_eq!(totals.total_tests, 0);
    assert_eq!(totals.passed_tests(), 0);
    assert_eq!(totals.failed_tests, 0);
    assert_eq!(totals.success_rate_percent(), 0);
    assert_eq!(outcome.report.coverage.coverage_percent(), 0);

    let html = std::fs::read_to_string(&config.output_path).unwrap();
    assert!(html.contains("No test suites"));
    assert!(html.contains("No test details"));
}

#[test]
fn generate_fails_without_template() {
    let root = tempfile::tempdir().unwrap();
    let config = report_config(root.path());

    match generate_report(&config) {
        Err(ReportError::MissingTemplate { path }) => assert_eq!(path, config.template_path),
        other => panic!("Expected MissingTemplate, got {:?}", other),
    }
    assert!(!config.output_path.exists());
}

#[test]
fn missing_template_message_names_path() {
    let err = ReportError::MissingTemplate {
        path: PathBuf::from("src/test/resources/test-report-template.html"),
    };
    assert!(err.to_string().contains("src/test/resources/test-report-template.html"));
}

#[test]
fn generate_overwrites_existing_output() {
    let root = tempfile::tempdir().unwrap();
    let config = report_config(root.path());
    write(config.template_path.parent().unwrap(), "test-report-template.html", "{{TOTAL_TESTS}}");
    write(config.output_path.parent().unwrap(), "test-report.html", "stale content that is longer");

    generate_report(&config).unwrap();
    assert_eq!(std::fs::read_to_string(&config.output_path).unwrap(), "0");
}

#[test]
fn generate_writes_json_summary() {
    let root = tempfile::tempdir().unwrap();
    let mut config = report_config(root.path());
    config.json_summary = Some(root.path().join("out/summary.json"));

    write(
        &config.results_dir,
        "TEST-a.xml",
        &junit_file(2, 1, 0, &[("a", "pkg.Foo", "0.1"), ("b", "pkg.Foo", "0.2")]),
    );
    write(config.template_path.parent().unwrap(), "test-report-template.html", FULL_TEMPLATE);

    generate_report(&config).unwrap();

    let json = std::fs::read_to_string(root.path().join("out/summary.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["total_tests"], 2);
    assert_eq!(value["passed_tests"], 1);
    assert_eq!(value["failed_tests"], 1);
    assert_eq!(value["success_rate"], 50);
    assert_eq!(value["coverage"], 0);
    assert_eq!(value["suites"]["Foo"]["test_count"], 2);
    assert_eq!(value["suites"]["Foo"]["all_passed"], false);
    assert_eq!(value["cases"][1]["name"], "b");
    assert_eq!(value["cases"][1]["failed"], true);
}

#[test]
fn collect_uses_case_attribution() {
    let root = tempfile::tempdir().unwrap();
    let config = report_config(root.path());
    write(
        &config.results_dir,
        "TEST-a.xml",
        r#"<testsuite tests="2" failures="1" errors="0">
<testcase name="ok" classname="p.Foo" time="0.1"/>
<testcase name="bad" classname="p.Foo" time="0.1"><failure message="x"/></testcase>
</testsuite>"#,
    );

    let report = collect(
        &config.results_dir,
        "xml",
        &config.coverage_path,
        FailureAttribution::Case,
    );
    assert!(!report.cases[0].failed);
    assert!(report.cases[1].failed);
}

#[test]
fn generate_succeeds_when_tests_fail() {
    let root = tempfile::tempdir().unwrap();
    let config = report_config(root.path());
    write(config.template_path.parent().unwrap(), "test-report-template.html", FULL_TEMPLATE);
    write(
        &config.results_dir,
        "TEST-a.xml",
        &junit_file(2, 2, 0, &[("a", "p.Foo", "0.1"), ("b", "p.Foo", "0.2")]),
    );

    let artifacts = ArtifactArgs {
        results_dir: Some(config.results_dir.clone()),
        coverage: Some(config.coverage_path.clone()),
        ..ArtifactArgs::default()
    };
    let result = cmd_generate(
        &artifacts,
        Some(config.template_path.clone()),
        Some(config.output_path.clone()),
        Some("2024-05-01".to_string()),
        None,
        &AppConfig::default(),
    );

    assert!(result.is_ok());
    let html = std::fs::read_to_string(&config.output_path).unwrap();
    assert!(html.contains("<p>Failed: 2</p>"));
}
