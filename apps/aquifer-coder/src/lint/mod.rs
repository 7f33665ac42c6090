//! Command orchestration: map a subcommand onto linter domains and passes,
//! resolve each domain's targets once, then run its passes in order.
//!
//! Progress is reported through `Event`s so the caller decides how to
//! render it. Each domain is independent: a resolution failure in one does
//! not stop the other.

pub mod eslint;
pub mod php;

use crate::config::{Effective, LinterConfig, UnsupportedTarget};
use crate::error::{CoderError, Result};
use crate::models::LintReport;
use crate::resolve::{self, RequestScope, ResolvedTarget};
use crate::runner::ToolRunner;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Subcommands that lint.
pub enum Command {
    JsLint,
    PhpLint,
    Lint,
    /// Coding standards only.
    Cs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A linter family with its own configuration.
pub enum Domain {
    Js,
    Php,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
/// One tool run inside a domain.
pub enum Pass {
    Eslint,
    PhpSyntax,
    PhpStandards,
}

impl Command {
    pub fn domains(self) -> &'static [Domain] {
        match self {
            Command::JsLint => &[Domain::Js],
            Command::PhpLint | Command::Cs => &[Domain::Php],
            Command::Lint => &[Domain::Js, Domain::Php],
        }
    }

    /// Passes for `domain`, in execution order.
    pub fn passes(self, domain: Domain) -> &'static [Pass] {
        match (self, domain) {
            (_, Domain::Js) => &[Pass::Eslint],
            (Command::Cs, Domain::Php) => &[Pass::PhpStandards],
            (_, Domain::Php) => &[Pass::PhpSyntax, Pass::PhpStandards],
        }
    }

    pub fn scope(self) -> RequestScope {
        match self {
            Command::Lint => RequestScope::Combined,
            _ => RequestScope::Explicit,
        }
    }
}

impl Domain {
    /// Name used in resolution messages.
    pub fn linter_name(self) -> &'static str {
        match self {
            Domain::Js => eslint::NAME,
            Domain::Php => "PHP linting",
        }
    }

    pub fn config(self, eff: &Effective) -> &LinterConfig {
        match self {
            Domain::Js => &eff.eslint,
            Domain::Php => &eff.phpcs,
        }
    }
}

impl Pass {
    pub fn name(self) -> &'static str {
        match self {
            Pass::Eslint => eslint::NAME,
            Pass::PhpSyntax => php::SYNTAX_NAME,
            Pass::PhpStandards => php::STANDARDS_NAME,
        }
    }

    /// Console line announcing the pass.
    pub fn banner(self) -> &'static str {
        match self {
            Pass::Eslint => "Running linters on JavaScript code files...",
            Pass::PhpSyntax => "Running linters on PHP code files...",
            Pass::PhpStandards => "Running coding standards sniffers on PHP code files...",
        }
    }
}

/// What a pass needs beyond its targets and linter config.
pub struct PassContext<'a> {
    pub eff: &'a Effective,
    pub runner: &'a dyn ToolRunner,
}

/// Run one pass over already-resolved targets.
pub fn run_pass(pass: Pass, targets: &[ResolvedTarget], ctx: &PassContext<'_>) -> Result<LintReport> {
    match pass {
        Pass::Eslint => eslint::invoke(targets, &ctx.eff.eslint, ctx),
        Pass::PhpSyntax => php::check_syntax(targets, &ctx.eff.phpcs, ctx),
        Pass::PhpStandards => php::check_standards(targets, &ctx.eff.phpcs, ctx),
    }
}

#[derive(Debug)]
/// Progress notifications emitted by `run_command`, in order.
pub enum Event {
    PassStarted(Pass),
    PassFinished(Pass, LintReport),
    PassFailed(Pass, CoderError),
    /// The domain's effective target list is empty.
    NoTargets(Domain),
    /// Targets are configured but none of them matched a lintable file.
    NoMatches(Domain),
    /// A combined run skipped a domain that does not apply to the target.
    Skipped(Domain, CoderError),
    ResolveFailed(Domain, CoderError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Totals across every pass of a command.
pub struct RunSummary {
    pub files: usize,
    pub messages: usize,
    pub errors: usize,
}

impl RunSummary {
    /// 2 on any error, 1 on reported messages when configured, else 0.
    pub fn exit_code(&self, fail_on_violations: bool) -> i32 {
        if self.errors > 0 {
            2
        } else if fail_on_violations && self.messages > 0 {
            1
        } else {
            0
        }
    }
}

/// Run `command` against the project described by `eff`.
///
/// `target` is the CLI-supplied path, if any; it replaces the configured
/// target lists for every domain.
pub fn run_command(
    command: Command,
    target: Option<&str>,
    eff: &Effective,
    runner: &dyn ToolRunner,
    on_event: &mut dyn FnMut(Event),
) -> RunSummary {
    let ctx = PassContext { eff, runner };
    let mut summary = RunSummary::default();
    for &domain in command.domains() {
        let resolved = resolve::resolve(
            target,
            domain.config(eff),
            &eff.project_root,
            domain.linter_name(),
            command.scope(),
        );
        let targets = match resolved {
            Ok(t) => t,
            Err(e) if e.is_skippable() => {
                tracing::debug!(error = %e, "skipping domain");
                if eff.policy.unsupported_target == UnsupportedTarget::Warn {
                    on_event(Event::Skipped(domain, e));
                }
                continue;
            }
            Err(e) => {
                summary.errors += 1;
                on_event(Event::ResolveFailed(domain, e));
                continue;
            }
        };
        if targets.is_empty() {
            if domain.config(eff).targets.is_empty() {
                on_event(Event::NoTargets(domain));
            } else {
                on_event(Event::NoMatches(domain));
            }
            continue;
        }
        tracing::debug!(domain = ?domain, count = targets.len(), "resolved targets");
        for &pass in command.passes(domain) {
            on_event(Event::PassStarted(pass));
            match run_pass(pass, &targets, &ctx) {
                Ok(report) => {
                    summary.files += report.files.len();
                    summary.messages += report.message_count();
                    on_event(Event::PassFinished(pass, report));
                }
                Err(e) => {
                    summary.errors += 1;
                    on_event(Event::PassFailed(pass, e));
                }
            }
        }
    }
    summary
}
