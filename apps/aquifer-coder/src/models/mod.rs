//! Shared data models: the normalized lint report and the raw report
//! schemas emitted by the external tools.

pub mod eslint;
pub mod phpcs;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Message severity. Only blocking parse failures are `Fatal`.
pub enum Severity {
    Warning,
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single diagnostic at a 1-based line and column.
pub struct Message {
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl Message {
    /// Build a message, clamping line and column to at least 1.
    pub fn new(line: usize, column: usize, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            line: line.max(1),
            column: column.max(1),
            severity,
            text: text.into(),
            rule: None,
        }
    }

    pub fn with_rule(mut self, rule: Option<String>) -> Self {
        self.rule = rule;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Messages reported for one file, in tool order.
pub struct FileResult {
    pub file_path: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Normalized output of one linter pass.
pub struct LintReport {
    pub files: Vec<FileResult>,
}

impl LintReport {
    pub fn message_count(&self) -> usize {
        self.files.iter().map(|f| f.messages.len()).sum()
    }
}
