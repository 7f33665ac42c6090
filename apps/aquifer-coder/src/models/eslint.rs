//! ESLint `--format json` schema (the fields this tool reads).

use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
/// Results for one linted file.
pub struct EslintFile {
    pub file_path: String,
    #[serde(default)]
    pub messages: Vec<EslintMessage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
/// One ESLint message. `line`/`column` are absent for file-level problems.
pub struct EslintMessage {
    #[serde(default)]
    pub line: Option<usize>,
    #[serde(default)]
    pub column: Option<usize>,
    #[serde(default)]
    pub fatal: bool,
    #[serde(default)]
    pub rule_id: Option<String>,
    pub message: String,
}
