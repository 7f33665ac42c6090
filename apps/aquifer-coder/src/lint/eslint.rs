//! ESLint pass for JavaScript targets.

use super::PassContext;
use crate::config::LinterConfig;
use crate::error::{CoderError, Result};
use crate::models::eslint::EslintFile;
use crate::models::{FileResult, LintReport, Message, Severity};
use crate::resolve::ResolvedTarget;
use crate::runner::ToolCommand;

pub const NAME: &str = "ESLint";

/// Globals environment every run assumes.
const ENVIRONMENT: &str = "browser";

/// Notice ESLint attaches to an explicitly passed file its ignore rules skip.
const IGNORED_NOTICE: &str = "File ignored because of a matching ignore pattern";

/// Build the ESLint command line. Fails when the rule-set file is missing.
///
/// A configured ignore file that does not exist is left out rather than
/// failing the run.
pub fn command(targets: &[ResolvedTarget], config: &LinterConfig, ctx: &PassContext<'_>) -> Result<ToolCommand> {
    if !config.config_path.is_file() {
        return Err(CoderError::tool(
            NAME,
            format!("rule-set file not found: {}", config.config_path.display()),
        ));
    }
    let exts = config
        .extension_list()
        .iter()
        .map(|e| format!(".{e}"))
        .collect::<Vec<_>>()
        .join(",");
    let mut cmd = ToolCommand::new(&ctx.eff.tools.eslint)
        .arg("--config")
        .arg(config.config_path.to_string_lossy())
        .args(["--env", ENVIRONMENT, "--format", "json", "--ext"])
        .arg(exts)
        .current_dir(&ctx.eff.project_root);
    if let Some(ignore) = config.ignore_path.as_ref() {
        if ignore.is_file() {
            cmd = cmd.arg("--ignore-path").arg(ignore.to_string_lossy());
        } else if ignore.starts_with(&ctx.eff.plugin_dir) {
            tracing::debug!(path = %ignore.display(), "plugin ships no ESLint ignore file");
        } else {
            tracing::warn!(path = %ignore.display(), "ESLint ignore file not found; running without it");
        }
    }
    Ok(cmd.args(targets.iter().map(|t| t.absolute_path.to_string_lossy().to_string())))
}

/// Run ESLint over `targets` and normalize its JSON report.
pub fn invoke(targets: &[ResolvedTarget], config: &LinterConfig, ctx: &PassContext<'_>) -> Result<LintReport> {
    let cmd = command(targets, config, ctx)?;
    let out = ctx.runner.run(&cmd)?;
    match out.exit_code {
        // 1 means lint problems were found
        Some(0) | Some(1) => parse_report(&out.stdout),
        Some(code) => Err(CoderError::tool(
            NAME,
            format!("exited with status {code}: {}", first_line(&out.stdout)),
        )),
        None => Err(CoderError::tool(NAME, "terminated by a signal")),
    }
}

/// True when ESLint skipped the file and only reported that it did.
fn is_ignored(file: &EslintFile) -> bool {
    match file.messages.as_slice() {
        [m] => !m.fatal && m.rule_id.is_none() && m.line.is_none() && m.message.starts_with(IGNORED_NOTICE),
        _ => false,
    }
}

/// Parse `eslint --format json` output. Files skipped by the ignore file are
/// dropped.
pub fn parse_report(stdout: &str) -> Result<LintReport> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(LintReport::default());
    }
    let files: Vec<EslintFile> = serde_json::from_str(trimmed)
        .map_err(|e| CoderError::tool(NAME, format!("unreadable report: {e}")))?;
    let files = files
        .into_iter()
        .filter(|f| {
            let ignored = is_ignored(f);
            if ignored {
                tracing::debug!(file = %f.file_path, "ignored by ESLint");
            }
            !ignored
        })
        .map(|f| FileResult {
            file_path: f.file_path,
            messages: f
                .messages
                .into_iter()
                .map(|m| {
                    let severity = if m.fatal {
                        Severity::Fatal
                    } else {
                        Severity::Warning
                    };
                    Message::new(
                        m.line.unwrap_or(1),
                        m.column.unwrap_or(1),
                        severity,
                        m.message,
                    )
                    .with_rule(m.rule_id)
                })
                .collect(),
        })
        .collect();
    Ok(LintReport { files })
}

fn first_line(s: &str) -> &str {
    s.lines().find(|l| !l.trim().is_empty()).unwrap_or("no output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::{run_command, Command, Event};
    use crate::runner::testing::{effective, touch, ScriptedRunner};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_report_maps_fatal_and_defaults_positions() {
        let json = r#"[
  {"filePath": "/p/a.js", "messages": [], "errorCount": 0},
  {"filePath": "/p/b.js", "messages": [
    {"ruleId": null, "fatal": true, "severity": 2, "message": "Parsing error: Unexpected token", "line": 3, "column": 5},
    {"ruleId": "no-unused-vars", "severity": 1, "message": "'x' is defined but never used."},
    {"fatal": false, "severity": 1, "message": "File ignored because of a matching ignore pattern."}
  ]},
  {"filePath": "/p/lib.min.js", "messages": [
    {"fatal": false, "severity": 1, "message": "File ignored because of a matching ignore pattern. Use \"--no-ignore\" to override."}
  ]}
]"#;
        let report = parse_report(json).unwrap();
        assert_eq!(report.files.len(), 2);
        assert!(report.files[0].messages.is_empty());
        let msgs = &report.files[1].messages;
        assert_eq!(msgs[0], Message::new(3, 5, Severity::Fatal, "Parsing error: Unexpected token"));
        assert_eq!(msgs[1].severity, Severity::Warning);
        assert_eq!(msgs[1].rule.as_deref(), Some("no-unused-vars"));
        assert_eq!((msgs[1].line, msgs[1].column), (1, 1));
        assert_eq!(msgs.len(), 3);
    }

    #[test]
    fn test_ignored_file_is_dropped_and_run_stays_clean() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        let a = touch(root, "src/a.js").to_string_lossy().to_string();
        let min = touch(root, "src/lib.min.js").to_string_lossy().to_string();
        fs::write(root.join(".eslintrc"), "{}").unwrap();
        fs::write(root.join(".eslintignore"), "*.min.js\n").unwrap();
        let eff = effective(
            root,
            "[eslint]\nconfig = \".eslintrc\"\nignore = \".eslintignore\"\ntargets = [\"src\"]\n",
        );
        let stdout = serde_json::json!([
            {"filePath": &a, "messages": []},
            {"filePath": &min, "messages": [
                {"fatal": false, "severity": 1, "message": "File ignored because of a matching ignore pattern. Use \"--no-ignore\" to override."}
            ]}
        ])
        .to_string();
        let runner = ScriptedRunner::new().respond(&stdout, 0);

        let mut reports = Vec::new();
        let summary = run_command(Command::JsLint, None, &eff, &runner, &mut |e| {
            if let Event::PassFinished(_, report) = e {
                reports.push(report);
            }
        });
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].files.len(), 1);
        assert_eq!(reports[0].files[0].file_path, a);
        assert_eq!(summary.messages, 0);
        assert_eq!(summary.exit_code(true), 0);
    }

    #[test]
    fn test_parse_report_rejects_garbage() {
        let err = parse_report("Oops! Something went wrong!").unwrap_err();
        assert!(matches!(err, CoderError::ToolInvocation { .. }));
    }

    #[test]
    fn test_missing_rule_set_fails_before_running() {
        let tmp = tempdir().unwrap();
        let eff = effective(tmp.path(), "[eslint]\nconfig = \"missing/.eslintrc\"\n");
        let runner = ScriptedRunner::new();
        let ctx = PassContext { eff: &eff, runner: &runner };
        let targets = vec![ResolvedTarget::file(tmp.path().join("a.js"))];
        let err = invoke(&targets, &eff.eslint, &ctx).unwrap_err();
        assert!(err.to_string().contains("rule-set file not found"));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_command_line_and_missing_ignore_file() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join(".eslintrc"), "{}").unwrap();
        let eff = effective(
            root,
            "[eslint]\nconfig = \".eslintrc\"\nignore = \".eslintignore\"\n[tools]\neslint = \"node_modules/.bin/eslint\"\n",
        );
        let runner = ScriptedRunner::new();
        let ctx = PassContext { eff: &eff, runner: &runner };
        let targets = vec![ResolvedTarget::directory(root.join("themes"))];

        let cmd = command(&targets, &eff.eslint, &ctx).unwrap();
        assert_eq!(cmd.program, "node_modules/.bin/eslint");
        let config_arg = root.join(".eslintrc").to_string_lossy().to_string();
        let themes_arg = root.join("themes").to_string_lossy().to_string();
        assert_eq!(
            cmd.args,
            vec![
                "--config",
                config_arg.as_str(),
                "--env",
                "browser",
                "--format",
                "json",
                "--ext",
                ".js",
                themes_arg.as_str(),
            ]
        );
        assert_eq!(cmd.cwd.as_deref(), Some(root));

        fs::write(root.join(".eslintignore"), "vendor/\n").unwrap();
        let cmd = command(&targets, &eff.eslint, &ctx).unwrap();
        assert!(cmd.args.windows(2).any(|w| w[0] == "--ignore-path" && w[1].ends_with(".eslintignore")));
    }

    #[test]
    fn test_default_ignore_file_absent_from_plugin() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join(".eslintrc"), "{}").unwrap();
        let eff = effective(root, "[eslint]\nconfig = \".eslintrc\"\n");
        let ignore = eff.eslint.ignore_path.clone().unwrap();
        assert!(ignore.starts_with(&eff.plugin_dir));
        let runner = ScriptedRunner::new();
        let ctx = PassContext { eff: &eff, runner: &runner };

        let cmd = command(&[ResolvedTarget::file(root.join("a.js"))], &eff.eslint, &ctx).unwrap();
        assert!(!cmd.args.iter().any(|a| a == "--ignore-path"));
    }

    #[test]
    fn test_unexpected_exit_status_is_invocation_error() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join(".eslintrc"), "{}").unwrap();
        let eff = effective(tmp.path(), "[eslint]\nconfig = \".eslintrc\"\n");
        let runner = ScriptedRunner::new().respond("\nOops! Something went wrong!\n", 2);
        let ctx = PassContext { eff: &eff, runner: &runner };
        let targets = vec![ResolvedTarget::file(tmp.path().join("a.js"))];
        let err = invoke(&targets, &eff.eslint, &ctx).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ESLint could not be run: exited with status 2: Oops! Something went wrong!"
        );
    }
}
