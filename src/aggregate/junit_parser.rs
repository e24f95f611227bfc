use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

// ============================================================================
// JUnit XML result parsing — tolerant, attribute-name keyed
// ============================================================================

/// Start tags of the three elements the report cares about. The attribute
/// text is matched loosely so one malformed attribute does not hide the tag;
/// quoted values may contain `>`.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<(testsuites|testsuite|testcase)((?:\s(?:[^>"']|"[^"]*"|'[^']*')*?)?)(/?)>"#,
    )
    .expect("tag pattern is valid")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=/>]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("attribute pattern is valid")
});

static FAILURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:failure|error)[\s/>]").expect("failure pattern is valid"));

const CASE_END: &str = "</testcase>";
const CASE_START: &str = "<testcase";

/// One `<testcase>` entry, before any failure attribution policy is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCase {
    pub name: String,
    pub classname: String,
    pub time: String,

    /// The case element itself contains a `<failure>` or `<error>` child
    pub has_failure_markup: bool,
}

/// Everything extracted from one result file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResultFile {
    pub tests: u64,
    pub failures: u64,
    pub errors: u64,
    pub cases: Vec<ParsedCase>,
}

impl ParsedResultFile {
    /// Failures and errors together, as counted towards the failed total.
    pub fn failed(&self) -> u64 {
        self.failures.saturating_add(self.errors)
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Suites,
    Suite,
    Case,
}

#[derive(Debug)]
struct Tag {
    kind: TagKind,
    attrs: HashMap<String, String>,
    self_closing: bool,
    end: usize,
}

/// Parse one result file. Never fails: missing or malformed counts are 0,
/// and a file with no recognizable elements yields no cases.
pub fn parse_result_file(content: &str) -> ParsedResultFile {
    let tags = scan_tags(content);

    let mut cases = Vec::new();
    for tag in tags.iter().filter(|t| t.kind == TagKind::Case) {
        let has_failure_markup = if tag.self_closing {
            false
        } else {
            FAILURE_RE.is_match(case_body(&content[tag.end..]))
        };

        cases.push(ParsedCase {
            name: attr_or_default(&tag.attrs, "name", ""),
            classname: attr_or_default(&tag.attrs, "classname", ""),
            time: attr_or_default(&tag.attrs, "time", "0"),
            has_failure_markup,
        });
    }

    ParsedResultFile {
        tests: file_count(&tags, "tests"),
        failures: file_count(&tags, "failures"),
        errors: file_count(&tags, "errors"),
        cases,
    }
}

/// Text of a case element after its start tag. Ends at `</testcase>`, or at
/// the next `<testcase` when the close tag is missing from a truncated file.
fn case_body(rest: &str) -> &str {
    let end = [rest.find(CASE_END), rest.find(CASE_START)]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(rest.len());
    &rest[..end]
}

fn scan_tags(content: &str) -> Vec<Tag> {
    TAG_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let kind = match caps.get(1)?.as_str() {
                "testsuites" => TagKind::Suites,
                "testsuite" => TagKind::Suite,
                _ => TagKind::Case,
            };
            let attrs = caps.get(2).map(|m| parse_attrs(m.as_str())).unwrap_or_default();
            let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
            Some(Tag {
                kind,
                attrs,
                self_closing,
                end: caps.get(0)?.end(),
            })
        })
        .collect()
}

fn parse_attrs(raw: &str) -> HashMap<String, String> {
    ATTR_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().to_string();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            Some((key, decode_entities(value)))
        })
        .collect()
}

/// A file-level count: taken from a `<testsuites>` root when it carries the
/// attribute, otherwise summed over the `<testsuite>` elements.
fn file_count(tags: &[Tag], attr: &str) -> u64 {
    let root = tags
        .iter()
        .find(|t| t.kind == TagKind::Suites)
        .and_then(|t| t.attrs.get(attr));

    match root {
        Some(value) => parse_count(attr, value),
        None => tags
            .iter()
            .filter(|t| t.kind == TagKind::Suite)
            .filter_map(|t| t.attrs.get(attr))
            .map(|value| parse_count(attr, value))
            .fold(0, u64::saturating_add),
    }
}

fn parse_count(attr: &str, value: &str) -> u64 {
    match value.trim().parse::<u64>() {
        Ok(n) => n,
        Err(_) => {
            debug!("non-numeric {}=\"{}\", counting as 0", attr, value);
            0
        }
    }
}

fn attr_or_default(attrs: &HashMap<String, String>, key: &str, default: &str) -> String {
    attrs
        .get(key)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

/// Decode the predefined XML entities. `&amp;` goes last so `&amp;lt;` stays `&lt;`.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
