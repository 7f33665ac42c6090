//! PHP_CodeSniffer `--report=json` schema.
//!
//! `files` is kept as a raw JSON object so the tool's file order survives
//! deserialization (`serde_json` is built with `preserve_order`).

use serde::Deserialize;
use serde_json::{Map, Value as Json};

#[derive(Deserialize)]
/// Top-level PHPCS report.
pub struct PhpcsReport {
    #[serde(default)]
    pub files: Map<String, Json>,
}

#[derive(Deserialize)]
/// Messages for one sniffed file.
pub struct PhpcsFile {
    #[serde(default)]
    pub messages: Vec<PhpcsMessage>,
}

#[derive(Deserialize)]
/// One sniff violation.
pub struct PhpcsMessage {
    pub message: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub column: usize,
}
