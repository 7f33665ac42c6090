//! aquifer-coder CLI binary entry point.
//! Resolves configuration, runs the requested linters, and prints results.

use aquifer_coder::cli::{Cli, Commands, RunArgs};
use aquifer_coder::lint::{self, Command, Domain, Event, Pass};
use aquifer_coder::models::LintReport;
use aquifer_coder::runner::ProcessRunner;
use aquifer_coder::{config, output, utils};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter.
const LOG_ENV: &str = "AQUIFER_CODER_LOG";

fn main() {
    init_logging();
    let cli = Cli::parse();
    let (command, args) = match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Commands::Jslint { args } => (Command::JsLint, args),
        Commands::Phplint { args } => (Command::PhpLint, args),
        Commands::Lint { args } => (Command::Lint, args),
        Commands::Cs { args } => (Command::Cs, args),
    };
    std::process::exit(run(command, &args));
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Command, args: &RunArgs) -> i32 {
    let eff = match config::resolve_effective(
        args.project_root.as_deref(),
        args.plugin_dir.as_deref(),
        args.output.as_deref(),
    ) {
        Ok(eff) => eff,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            return e.exit_code();
        }
    };
    let json = eff.output == "json";
    if eff.settings_path.is_none() && !json {
        eprintln!(
            "{} No aquifer-coder settings found; using defaults.",
            utils::note_prefix()
        );
    }
    tracing::debug!(
        root = %eff.project_root.display(),
        plugin = %eff.plugin_dir.display(),
        "effective configuration resolved"
    );

    let mut reports: Vec<(Pass, LintReport)> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    let summary = lint::run_command(
        command,
        args.target.as_deref(),
        &eff,
        &ProcessRunner,
        &mut |event| match event {
            Event::PassStarted(pass) => {
                if !json {
                    eprintln!("{} {}", utils::info_prefix(), pass.banner());
                }
            }
            Event::PassFinished(pass, report) => {
                if json {
                    reports.push((pass, report));
                } else {
                    output::print_report(&report, &eff.output);
                }
            }
            Event::PassFailed(_, e) | Event::ResolveFailed(_, e) => {
                if json {
                    errors.push(e.to_string());
                } else {
                    eprintln!("{} {}", utils::error_prefix(), e);
                }
            }
            Event::Skipped(_, e) => {
                if !json {
                    eprintln!("{} {}; skipping.", utils::warn_prefix(), e);
                }
            }
            Event::NoTargets(domain) => {
                if !json {
                    eprintln!(
                        "{} No targets defined for {}; nothing to lint.",
                        utils::info_prefix(),
                        domain_label(domain)
                    );
                }
            }
            Event::NoMatches(domain) => {
                if !json {
                    eprintln!(
                        "{} No files matched the configured {} targets; nothing to lint.",
                        utils::info_prefix(),
                        domain_label(domain)
                    );
                }
            }
        },
    );

    if json {
        let out = output::compose_run_json(&reports, &errors, &summary);
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("{} {}", utils::error_prefix(), e),
        }
    }
    summary.exit_code(eff.policy.fail_on_violations)
}

fn domain_label(domain: Domain) -> &'static str {
    match domain {
        Domain::Js => "JavaScript",
        Domain::Php => "PHP",
    }
}
