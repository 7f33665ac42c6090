//! CLI argument parsing via `clap`.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "aquifer-coder",
    version,
    about = "Coding standards sniffers and linters for Aquifer projects",
    long_about = "aquifer-coder runs ESLint, the PHP syntax checker, and PHP_CodeSniffer over a Drupal project built with Aquifer.\n\nConfiguration precedence: CLI > aquifer-coder.toml (or aquifer.json) > defaults.",
    after_help = "Examples:\n  aquifer-coder lint\n  aquifer-coder jslint --target themes/custom/site/js/site.js\n  aquifer-coder phplint --target modules/custom/news\n  aquifer-coder cs --output json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Clone, Debug, Default)]
/// Options shared by every linting subcommand.
pub struct RunArgs {
    #[arg(long, help = "Lint only this file or directory (relative to the project root)")]
    pub target: Option<String>,
    #[arg(long, help = "Project root (default: closest ancestor with aquifer.json or .git)")]
    pub project_root: Option<String>,
    #[arg(long, help = "Plugin installation directory holding default rule-sets (default: $AQUIFER_CODER_HOME)")]
    pub plugin_dir: Option<String>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current aquifer-coder version.")]
    Version,
    /// Lint JavaScript with ESLint
    #[command(
        about = "Lints JavaScript code in the project for errors",
        after_help = "Examples:\n  aquifer-coder jslint\n  aquifer-coder jslint --target themes/custom"
    )]
    Jslint {
        #[command(flatten)]
        args: RunArgs,
    },
    /// Syntax-check and sniff PHP
    #[command(
        about = "Lints PHP code in the project for errors",
        long_about = "Runs the PHP syntax checker, then PHP_CodeSniffer. Syntax errors are reported first."
    )]
    Phplint {
        #[command(flatten)]
        args: RunArgs,
    },
    /// Run every linter
    #[command(
        about = "Lints PHP and JavaScript code in the project for errors",
        long_about = "Runs ESLint and both PHP passes. With --target, linters that do not handle the file type are skipped."
    )]
    Lint {
        #[command(flatten)]
        args: RunArgs,
    },
    /// Coding standards only
    #[command(
        about = "Runs coding standards sniffers on PHP code",
        long_about = "Runs PHP_CodeSniffer without the syntax check."
    )]
    Cs {
        #[command(flatten)]
        args: RunArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lint_with_target() {
        let cli = Cli::try_parse_from([
            "aquifer-coder",
            "phplint",
            "--target",
            "modules/custom/news",
            "--output",
            "json",
        ])
        .unwrap();
        match cli.cmd {
            Commands::Phplint { args } => {
                assert_eq!(args.target.as_deref(), Some("modules/custom/news"));
                assert_eq!(args.output.as_deref(), Some("json"));
                assert!(args.project_root.is_none());
            }
            _ => panic!("expected phplint"),
        }
    }

    #[test]
    fn test_cs_without_flags() {
        let cli = Cli::try_parse_from(["aquifer-coder", "cs"]).unwrap();
        assert!(matches!(cli.cmd, Commands::Cs { .. }));
    }
}
