//! Output rendering for lint reports.
//!
//! Supports `human` (default) and `json` outputs. Human output lists every
//! file in tool order with a pass/fail marker, one line per message, and a
//! blank line after each file. The JSON form collects every pass of a run
//! plus a top-level summary.

use crate::lint::{Pass, RunSummary};
use crate::models::{LintReport, Severity};
use crate::utils;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

/// Render `report` as printable lines.
pub fn format_report(report: &LintReport, color: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for file in &report.files {
        let path = utils::rel_to_wd(&file.file_path);
        if file.messages.is_empty() {
            let label = format!("✔ {}", path);
            lines.push(if color {
                label.black().on_green().to_string()
            } else {
                label
            });
            lines.push(String::new());
            continue;
        }
        let label = format!("✖ {}", path);
        lines.push(if color {
            label.white().on_red().to_string()
        } else {
            label
        });
        for m in &file.messages {
            let prefix = match m.severity {
                Severity::Fatal => "Fatal ",
                Severity::Warning => "",
            };
            if color {
                lines.push(format!(
                    "{}Error on line {} column {}: {}",
                    prefix,
                    m.line.black().on_yellow(),
                    m.column.black().on_yellow(),
                    m.text.red()
                ));
            } else {
                lines.push(format!(
                    "{}Error on line {} column {}: {}",
                    prefix, m.line, m.column, m.text
                ));
            }
        }
        lines.push(String::new());
    }
    lines
}

/// Print a report to stdout in human form.
pub fn print_report(report: &LintReport, output: &str) {
    for line in format_report(report, utils::use_colors(output)) {
        println!("{}", line);
    }
}

/// Compose the JSON document for a whole run (pure) for testing/snapshot
/// purposes.
pub fn compose_run_json(reports: &[(Pass, LintReport)], errors: &[String], summary: &RunSummary) -> JsonVal {
    let items: Vec<_> = reports
        .iter()
        .map(|(pass, report)| {
            json!({
                "pass": pass,
                "files": report.files,
            })
        })
        .collect();
    json!({
        "reports": items,
        "errors": errors,
        "summary": {
            "files": summary.files,
            "messages": summary.messages,
            "errors": summary.errors,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileResult, Message};

    fn sample() -> LintReport {
        LintReport {
            files: vec![
                FileResult {
                    file_path: "src/a.js".into(),
                    messages: vec![],
                },
                FileResult {
                    file_path: "src/b.js".into(),
                    messages: vec![
                        Message::new(3, 5, Severity::Fatal, "Unexpected token"),
                        Message::new(8, 2, Severity::Warning, "Missing semicolon."),
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_format_report_plain() {
        let lines = format_report(&sample(), false);
        assert_eq!(
            lines,
            vec![
                "✔ src/a.js",
                "",
                "✖ src/b.js",
                "Fatal Error on line 3 column 5: Unexpected token",
                "Error on line 8 column 2: Missing semicolon.",
                "",
            ]
        );
    }

    #[test]
    fn test_format_report_colored_keeps_text() {
        let lines = format_report(&sample(), true);
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("src/a.js") && lines[0].contains('\u{1b}'));
        assert!(lines[3].starts_with("Fatal Error on line "));
        assert!(lines[3].contains("Unexpected token"));
    }

    #[test]
    fn test_empty_report_prints_nothing() {
        assert!(format_report(&LintReport::default(), false).is_empty());
    }

    #[test]
    fn test_compose_run_json_shape() {
        let summary = RunSummary {
            files: 2,
            messages: 2,
            errors: 1,
        };
        let out = compose_run_json(
            &[(Pass::PhpSyntax, sample())],
            &["PHP_CodeSniffer could not be run: missing".to_string()],
            &summary,
        );
        assert_eq!(out["reports"][0]["pass"], "php-syntax");
        assert_eq!(out["reports"][0]["files"][1]["messages"][0]["severity"], "fatal");
        assert_eq!(out["reports"][0]["files"][1]["messages"][0]["line"], 3);
        assert!(out["reports"][0]["files"][1]["messages"][0].get("rule").is_none());
        assert_eq!(out["errors"][0], "PHP_CodeSniffer could not be run: missing");
        assert_eq!(out["summary"]["errors"], 1);
    }
}
