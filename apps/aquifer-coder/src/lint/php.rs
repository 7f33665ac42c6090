//! PHP passes: `php -l` syntax check and PHP_CodeSniffer standards check.
//!
//! The syntax check only reports blocking parse errors and runs before the
//! standards check so those surface first. The standards check never reports
//! generated Drupal export files (see `GENERATED_FILE_DENYLIST`).

use super::PassContext;
use crate::config::LinterConfig;
use crate::error::{CoderError, Result};
use crate::filter;
use crate::models::phpcs::{PhpcsFile, PhpcsReport};
use crate::models::{FileResult, LintReport, Message, Severity};
use crate::resolve::{self, ResolvedTarget};
use crate::runner::ToolCommand;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

pub const SYNTAX_NAME: &str = "PHP syntax check";
pub const STANDARDS_NAME: &str = "PHP_CodeSniffer";

/// Configuration-export artifacts excluded from standards checking.
pub const GENERATED_FILE_DENYLIST: [&str; 9] = [
    "*.apachesolr_environments.inc",
    "*.apachesolr_search_defaults.inc",
    "*.context.inc",
    "*.features.*.inc",
    "*.features.inc",
    "*.field_group.inc",
    "*.pages_default.inc",
    "*.strongarm.inc",
    "*.views_default.inc",
];

fn parse_error_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(?:PHP )?(?:Parse|Fatal) error:\s*(?P<text>.+?) in (?P<file>.+?) on line (?P<line>\d+)\s*$")
            .expect("static regex")
    })
}

fn denylist() -> &'static [glob::Pattern] {
    static PATTERNS: OnceLock<Vec<glob::Pattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        GENERATED_FILE_DENYLIST
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .collect()
    })
}

/// Whether the file name of `path` matches the generated-file denylist.
pub fn is_generated(path: &str) -> bool {
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    denylist().iter().any(|p| p.matches(&name))
}

/// Run `php -l` on every file covered by `targets`.
///
/// Every checked file appears in the report; files that fail to parse carry
/// one fatal message.
pub fn check_syntax(targets: &[ResolvedTarget], config: &LinterConfig, ctx: &PassContext<'_>) -> Result<LintReport> {
    let mut report = LintReport::default();
    for file in resolve::expand_files(targets, config) {
        let file_str = file.to_string_lossy().to_string();
        let cmd = ToolCommand::new(&ctx.eff.tools.php)
            .arg("-l")
            .arg(file_str.clone())
            .current_dir(&ctx.eff.project_root);
        let out = ctx.runner.run(&cmd)?;
        let messages = match out.exit_code {
            Some(0) => Vec::new(),
            Some(code) => vec![parse_syntax_output(&out.stdout, code)],
            None => return Err(CoderError::tool(SYNTAX_NAME, "terminated by a signal")),
        };
        report.files.push(FileResult {
            file_path: file_str,
            messages,
        });
    }
    Ok(report)
}

/// Turn failing `php -l` output into a single fatal message.
pub fn parse_syntax_output(stdout: &str, exit_code: i32) -> Message {
    if let Some(caps) = parse_error_re().captures(stdout) {
        let line = caps["line"].parse::<usize>().unwrap_or(1);
        return Message::new(line, 1, Severity::Fatal, caps["text"].trim());
    }
    let text = stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with("Errors parsing"))
        .map(str::to_string)
        .unwrap_or_else(|| format!("syntax check failed with status {exit_code}"));
    Message::new(1, 1, Severity::Fatal, text)
}

/// Patterns passed to `--ignore`: the fixed denylist followed by the lines
/// of the configured ignore file.
pub fn ignore_patterns(config: &LinterConfig) -> Vec<String> {
    let mut patterns: Vec<String> = GENERATED_FILE_DENYLIST.iter().map(|p| p.to_string()).collect();
    if let Some(path) = config.ignore_path.as_ref() {
        match fs::read_to_string(path) {
            Ok(s) => patterns.extend(
                s.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty() && !l.starts_with('#'))
                    .map(str::to_string),
            ),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "PHPCS ignore file unreadable; using the built-in list only")
            }
        }
    }
    patterns
}

/// Build the PHPCS command line. Fails when the standard is missing.
pub fn standards_command(
    targets: &[ResolvedTarget],
    config: &LinterConfig,
    ctx: &PassContext<'_>,
) -> Result<ToolCommand> {
    if !config.config_path.exists() {
        return Err(CoderError::tool(
            STANDARDS_NAME,
            format!("coding standard not found: {}", config.config_path.display()),
        ));
    }
    let cmd = ToolCommand::new(&ctx.eff.tools.phpcs)
        .arg(format!("--standard={}", config.config_path.display()))
        .arg("--report=json")
        .arg(format!("--extensions={}", config.extension_list().join(",")))
        .arg(format!("--ignore={}", ignore_patterns(config).join(",")))
        .args(targets.iter().map(|t| t.absolute_path.to_string_lossy().to_string()))
        .current_dir(&ctx.eff.project_root);
    Ok(cmd)
}

/// Run PHPCS over `targets` and normalize its report.
pub fn check_standards(
    targets: &[ResolvedTarget],
    config: &LinterConfig,
    ctx: &PassContext<'_>,
) -> Result<LintReport> {
    let cmd = standards_command(targets, config, ctx)?;
    let out = ctx.runner.run(&cmd)?;
    let Some(code) = out.exit_code else {
        return Err(CoderError::tool(STANDARDS_NAME, "terminated by a signal"));
    };
    let filters = filter::phpcs_filters(ctx.eff.strip_advertisement);
    let cleaned = filter::apply_all(&filters, &out.stdout);
    if cleaned.trim().is_empty() {
        if code == 0 {
            return Ok(LintReport::default());
        }
        return Err(CoderError::tool(
            STANDARDS_NAME,
            format!("exited with status {code} without a report"),
        ));
    }
    parse_standards_report(&cleaned)
}

/// Parse a filtered `--report=json` document, dropping generated files.
pub fn parse_standards_report(cleaned: &str) -> Result<LintReport> {
    let raw: PhpcsReport = serde_json::from_str(cleaned.trim())
        .map_err(|e| CoderError::tool(STANDARDS_NAME, format!("unreadable report: {e}")))?;
    let mut report = LintReport::default();
    for (path, value) in raw.files {
        if is_generated(&path) {
            tracing::debug!(file = %path, "skipping generated file");
            continue;
        }
        let file: PhpcsFile = serde_json::from_value(value)
            .map_err(|e| CoderError::tool(STANDARDS_NAME, format!("unreadable report entry: {e}")))?;
        report.files.push(FileResult {
            file_path: path,
            messages: file
                .messages
                .into_iter()
                .map(|m| Message::new(m.line, m.column, Severity::Warning, m.message).with_rule(m.source))
                .collect(),
        });
    }
    Ok(report)
}
