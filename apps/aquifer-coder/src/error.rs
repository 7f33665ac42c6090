//! Error types shared by resolution, invocation, and configuration loading.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
/// Failures surfaced to the user at the point of detection.
pub enum CoderError {
    #[error("Target not found: {}", .path.display())]
    TargetNotFound { path: PathBuf },

    /// `explicit` records whether the running command named this linter.
    /// Explicit requests are errors; combined runs treat the linter as
    /// irrelevant to the file.
    #[error("{}", unsupported_message(.path, .linter, .extensions, .explicit))]
    UnsupportedExtension {
        path: PathBuf,
        linter: &'static str,
        extensions: Vec<String>,
        explicit: bool,
    },

    #[error("{tool} could not be run: {message}")]
    ToolInvocation { tool: String, message: String },

    #[error("Invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoderError {
    pub fn tool(tool: &str, message: impl Into<String>) -> Self {
        Self::ToolInvocation {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    /// True for errors a combined run may skip without reporting.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::UnsupportedExtension { explicit: false, .. })
    }

    /// Process exit status for a run that hit this error.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

fn unsupported_message(
    path: &std::path::Path,
    linter: &str,
    extensions: &[String],
    explicit: &bool,
) -> String {
    if *explicit {
        format!(
            "{} cannot lint {} (expected one of: {})",
            linter,
            path.display(),
            extensions.join(", ")
        )
    } else {
        format!("{} does not apply to {}", linter, path.display())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CoderError>;
