//! External process boundary.
//!
//! Linter passes build a `ToolCommand` and hand it to a `ToolRunner`. The
//! process-backed runner blocks until the tool exits; there is no timeout.

use crate::error::{CoderError, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Program plus arguments, run from `cwd` when set.
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Shell-like rendering for logs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Captured stdout and exit status. `exit_code` is `None` when the process
/// was terminated by a signal.
pub struct ToolOutput {
    pub stdout: String,
    pub exit_code: Option<i32>,
}

/// Runs external tools. Substituted with scripted runners in tests.
pub trait ToolRunner {
    fn run(&self, cmd: &ToolCommand) -> Result<ToolOutput>;
}

/// Runs tools as child processes.
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&self, cmd: &ToolCommand) -> Result<ToolOutput> {
        tracing::debug!(command = %cmd.display(), "running tool");
        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        if let Some(dir) = cmd.cwd.as_ref() {
            command.current_dir(dir);
        }
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        let output = command
            .output()
            .map_err(|e| CoderError::tool(&cmd.program, e.to_string()))?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!(program = %cmd.program, stderr = %stderr.trim(), "tool stderr");
        }
        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            exit_code: output.status.code(),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted runner and project fixtures shared by the pass and command
    //! tests.

    use super::*;
    use crate::config::{self, CoderSettings, Effective};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Effective configuration for a project at `root` with TOML `settings`
    /// and the plugin installed under `root/plugin`.
    pub fn effective(root: &Path, settings: &str) -> Effective {
        let cfg: CoderSettings = toml::from_str(settings).unwrap();
        config::build_effective(root.to_path_buf(), root.join("plugin"), None, &cfg, None)
    }

    /// Create an empty file at `root/rel`, with its parent directories.
    pub fn touch(root: &Path, rel: &str) -> PathBuf {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(&p, "").unwrap();
        p
    }

    /// Replays canned outputs in order and records every command.
    #[derive(Default)]
    pub struct ScriptedRunner {
        responses: RefCell<VecDeque<Result<ToolOutput>>>,
        pub calls: RefCell<Vec<ToolCommand>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, stdout: &str, exit_code: i32) -> Self {
            self.responses.borrow_mut().push_back(Ok(ToolOutput {
                stdout: stdout.to_string(),
                exit_code: Some(exit_code),
            }));
            self
        }

        pub fn fail(self, tool: &str, message: &str) -> Self {
            self.responses
                .borrow_mut()
                .push_back(Err(CoderError::tool(tool, message)));
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl ToolRunner for ScriptedRunner {
        fn run(&self, cmd: &ToolCommand) -> Result<ToolOutput> {
            self.calls.borrow_mut().push(cmd.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected tool call: {}", cmd.display()))
        }
    }
}
