//! Tests for generated Markdown reports
//!
//! # Update snapshots
//!
//! ```
//! INSTA_UPDATE=always cargo test
//! ```

use exception_markdown::{
    format_exception, ArgValue, CallOperator, ExceptionRecord, Formatter, RequestSnapshot,
    StackFrame,
};
use format::strip_changing_values;
use regex::Regex;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn full_report() {
    init_logger();
    let exception = ExceptionRecord::new(
        "InvalidArgument",
        "Error with *special* `chars` [link] #hash",
        "/srv/app/src/handler.rs",
        42,
    )
    .with_frame(
        StackFrame::new("handle")
            .with_location("/srv/app/src/handler.rs", 42)
            .with_type("Handler", CallOperator::Instance)
            .with_args(vec![
                ArgValue::from("GET"),
                ArgValue::from(vec![1, 2, 3]),
                ArgValue::Null,
            ]),
    )
    .with_frame(
        StackFrame::new("dispatch")
            .with_location("/srv/app/src/router.rs", 17)
            .with_type("Router", CallOperator::Static)
            .with_args(vec![
                ArgValue::object("Request"),
                ArgValue::from(true),
                ArgValue::from(1.5),
            ]),
    )
    .with_frame(StackFrame::new("main"))
    .with_previous(ExceptionRecord::new(
        "IoError",
        "connection reset (os error 104)",
        "/srv/app/src/db.rs",
        9,
    ));
    let request = RequestSnapshot::new()
        .with_url("https://example.com/users/42?expand=true")
        .with_method("POST")
        .with_query("expand", "true")
        .with_body(json!({
            "username": "john",
            "password": "secret123",
            "profile": {
                "api_key": "k-123",
                "city": "Brno",
            },
        }))
        .with_header("Host", "example.com")
        .with_header("Authorization", "Bearer abc")
        .with_header("Accept", "application/json");

    let report = Formatter::new()
        .with_runtime("Rust", "1.81.0")
        .with_debugger("Inspector", Some("2.10.8".into()))
        .format(&exception, Some(&request));
    let full_report = strip_changing_values(&report);
    insta::assert_snapshot!(full_report);
}

#[test]
fn sections_are_in_order() {
    let exception = ExceptionRecord::new("RuntimeError", "Test error message", "/nope.rs", 1);
    let report = format_exception(&exception, None);

    let positions: Vec<usize> = ["# Error", "## Source file", "## Stack trace", "## Environment"]
        .iter()
        .map(|heading| {
            report
                .find(&format!("{}\n", heading))
                .expect("section exists")
        })
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, positions);
    assert!(report.starts_with("# Error\n\n**RuntimeError**: Test error message\n\n"));
    assert!(report.ends_with('\n'));
    assert!(!report.contains("## Request"));
    assert!(!report.contains("## Previous exception"));
}

#[test]
fn environment_lists_compiler_version() {
    let exception = ExceptionRecord::new("RuntimeError", "Test error message", "/nope.rs", 1);
    let report = format_exception(&exception, None);
    let runtime = Regex::new(r"(?m)^- \*\*Rust\*\*: \d+\.\d+\.\d+").unwrap();
    assert!(runtime.is_match(&report));
    assert!(report.contains("- **Debugger**: unknown\n"));
}

#[derive(Debug, thiserror::Error)]
#[error("request failed")]
struct RequestError(#[source] std::io::Error);

#[test]
fn error_cause_is_listed() {
    let err = RequestError(std::io::Error::new(
        std::io::ErrorKind::ConnectionReset,
        "connection reset",
    ));
    let report = format_exception(&ExceptionRecord::from_error(&err), None);
    assert!(report.contains(
        "## Previous exception\n\n**dyn Error**: connection reset\n\n**File**: `tests/report.rs:"
    ));
}

#[test]
fn message_is_escaped() {
    let exception = ExceptionRecord::new(
        "RuntimeError",
        "Error with *special* `chars` [link] #hash",
        "/nope.rs",
        1,
    );
    let report = format_exception(&exception, None);
    let header = report.lines().nth(2).expect("header line exists");
    assert_eq!(
        r"**RuntimeError**: Error with \*special\* \`chars\` \[link\] \#hash",
        header
    );
}

#[test]
fn sensitive_body_values_are_redacted() {
    let exception = ExceptionRecord::new("RuntimeError", "Test error message", "/nope.rs", 1);
    let request = RequestSnapshot::new()
        .with_url("http://example.com/test")
        .with_method("POST")
        .with_body(json!({"password": "secret123", "username": "john"}));
    let report = format_exception(&exception, Some(&request));

    assert!(report.contains("john"));
    assert!(!report.contains("secret123"));
    assert!(Regex::new(r#""password":\s*"\*\*\*REDACTED\*\*\*""#)
        .unwrap()
        .is_match(&report));
}

#[test]
fn nested_sensitive_body_values_are_redacted() {
    let exception = ExceptionRecord::new("RuntimeError", "Test error message", "/nope.rs", 1);
    let request = RequestSnapshot::new().with_body(json!({
        "user": {"name": "John", "password": "nested_secret"},
    }));
    let report = format_exception(&exception, Some(&request));

    assert!(report.contains("John"));
    assert!(report.contains("***REDACTED***"));
    assert!(!report.contains("nested_secret"));
}

#[test]
fn deeply_nested_body_is_redacted() {
    let exception = ExceptionRecord::new("RuntimeError", "Test error message", "/nope.rs", 1);
    let mut body = json!({"password": "bottom_secret"});
    for _ in 0..1_000 {
        body = json!({ "level": body });
    }
    let request = RequestSnapshot::new().with_body(body);
    let report = format_exception(&exception, Some(&request));

    assert!(report.contains("\"password\": \"***REDACTED***\""));
    assert!(!report.contains("bottom_secret"));
}

#[test]
fn empty_request_still_has_a_section() {
    let exception = ExceptionRecord::new("RuntimeError", "Test error message", "/nope.rs", 1);
    let request = RequestSnapshot::new()
        .with_url("http://example.com/test")
        .with_method("GET");
    let report = format_exception(&exception, Some(&request));

    assert!(report.contains(
        "## Request\n\n**URL**: `http://example.com/test`\n**Method**: `GET`\n\n## Environment"
    ));
    assert!(!report.contains("###"));
}

#[test]
fn long_string_arguments_are_cut_off() {
    let exception = ExceptionRecord::new("RuntimeError", "Test error message", "/nope.rs", 1)
        .with_frame(StackFrame::new("process").with_args(vec![ArgValue::from("a".repeat(80))]));
    let report = format_exception(&exception, None);
    assert!(report.contains(&format!("process(\"{}...\")", "a".repeat(50))));
    assert!(!report.contains(&"a".repeat(51)));
}

#[test]
fn code_excerpt_around_failing_line() {
    init_logger();
    let mut file = NamedTempFile::new().unwrap();
    for n in 1..=30 {
        writeln!(file, "let line_{} = {};", n, n).unwrap();
    }
    let path = file.path().to_string_lossy().into_owned();
    let exception = ExceptionRecord::new("RuntimeError", "Test error message", &path, 15);
    let report = Formatter::new()
        .with_code_language("rs")
        .format(&exception, None);

    let row = Regex::new(r"^(> |  ) *\d+ \| ").unwrap();
    let rows: Vec<&str> = report.lines().filter(|line| row.is_match(line)).collect();
    assert_eq!(11, rows.len());
    assert_eq!(
        vec![">   15 | let line_15 = 15;"],
        rows.iter()
            .filter(|row| row.starts_with("> "))
            .copied()
            .collect::<Vec<_>>()
    );
    assert_eq!("    10 | let line_10 = 10;", rows[0]);
    assert_eq!("    20 | let line_20 = 20;", rows[10]);
    assert!(report.contains("```rs\n    10 | "));
}

#[test]
fn code_excerpt_in_short_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "fn main() {{\n    run();\n}}").unwrap();
    let path = file.path().to_string_lossy().into_owned();
    let exception = ExceptionRecord::new("RuntimeError", "Test error message", &path, 2);
    let report = format_exception(&exception, None);

    assert!(report.contains(
        "```rust\n     1 | fn main() {\n>    2 |     run();\n     3 | }\n```\n\n## Stack trace"
    ));
}

#[test]
fn unreadable_source_file_has_no_excerpt() {
    init_logger();
    let exception = ExceptionRecord::new(
        "RuntimeError",
        "Test error message",
        "/definitely/not/here.rs",
        3,
    );
    let report = format_exception(&exception, None);
    assert!(report.contains(
        "## Source file\n\n**File**: `/definitely/not/here.rs:3`\n\n## Stack trace"
    ));
    assert!(!report.contains("```rust"));
}

mod format {
    use regex::Regex;

    pub fn strip_changing_values(report: &str) -> String {
        let date = Regex::new(r"(?P<prefix>- \*\*Date\*\*: )\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}")
            .unwrap();
        date.replace_all(report, "${prefix}STRIPPED").into()
    }
}
