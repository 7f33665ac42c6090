//! aquifer-coder core library.
//!
//! Coding standards sniffers and linters for Aquifer-built Drupal projects.
//! This crate resolves which files to lint, runs ESLint, the PHP syntax
//! checker, and PHP_CodeSniffer over them, and normalizes their reports.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Settings discovery, built-in defaults, and merging.
//! - `resolve`: Target resolution and extension filtering.
//! - `runner`: External process boundary (`ToolRunner`).
//! - `filter`: Post-processing of raw tool output.
//! - `lint`: Per-tool passes and command orchestration.
//! - `models`: Normalized report types and tool report schemas.
//! - `output`: Human/JSON printers.
//! - `error`: Error taxonomy.
//! - `utils`: Console helpers.
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod lint;
pub mod models;
pub mod output;
pub mod resolve;
pub mod runner;
pub mod utils;
