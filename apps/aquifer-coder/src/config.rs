//! Configuration discovery and effective settings resolution.
//!
//! aquifer-coder reads `aquifer-coder.toml|yaml|yml` from the project root
//! (or closest ancestor), falling back to the coder section of the Aquifer
//! project file `aquifer.json` (`extensions["aquifer-coder"].config`). The
//! settings are merged with built-in defaults and CLI flags to produce an
//! immutable `Effective` config.
//!
//! Defaults:
//! - `eslint.config`: `<plugin>/src/.eslintrc`
//! - `eslint.ignore`: `<plugin>/src/.eslintignore`
//! - `eslint.targets`: Drupal custom code directories plus `*.js`
//! - `phpcs.config`: `<plugin>/vendor/drupalmodule/coder/coder_sniffer/Drupal`
//! - `phpcs.extensions`: Drupal PHP suffixes
//! - `output`: `human`
//! - `lint.unsupported_target`: `skip`
//! - `lint.fail_on_violations`: true
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{CoderError, Result};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the plugin installation directory.
pub const PLUGIN_DIR_ENV: &str = "AQUIFER_CODER_HOME";

const SETTINGS_FILES: [&str; 3] = ["aquifer-coder.toml", "aquifer-coder.yaml", "aquifer-coder.yml"];
const AQUIFER_PROJECT_FILE: &str = "aquifer.json";
const EXTENSION_NAME: &str = "aquifer-coder";

/// Drupal code locations linted when a project does not list its own.
const DRUPAL_CODE_DIRS: [&str; 3] = ["modules/custom", "modules/features", "themes/custom"];
const DRUPAL_PHP_EXTENSIONS: [&str; 7] =
    ["php", "module", "inc", "install", "test", "profile", "theme"];

#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
/// Per-linter overrides under `[eslint]` or `[phpcs]`. Absent keys keep the
/// built-in default.
pub struct LinterOverrides {
    pub config: Option<String>,
    pub ignore: Option<String>,
    pub targets: Option<Vec<String>>,
    pub extensions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// `[phpcs]` section: linter overrides plus output post-processing.
pub struct PhpcsSection {
    #[serde(flatten)]
    pub linter: LinterOverrides,
    #[serde(alias = "stripAdvertisement")]
    pub strip_advertisement: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// `[tools]`: executables used for each pass.
pub struct ToolsCfg {
    pub eslint: Option<String>,
    pub php: Option<String>,
    pub phpcs: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
/// What the combined `lint` command does with a target a linter cannot handle.
pub enum UnsupportedTarget {
    #[default]
    Skip,
    Warn,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// `[lint]`: command-level policy.
pub struct LintCfg {
    #[serde(alias = "unsupportedTarget")]
    pub unsupported_target: Option<UnsupportedTarget>,
    #[serde(alias = "failOnViolations")]
    pub fail_on_violations: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root settings loaded from `aquifer-coder.toml|yaml` or `aquifer.json`.
pub struct CoderSettings {
    pub output: Option<String>,
    pub eslint: Option<LinterOverrides>,
    pub phpcs: Option<PhpcsSection>,
    pub tools: Option<ToolsCfg>,
    pub lint: Option<LintCfg>,
    /// Flat keys understood by earlier releases of the plugin.
    pub eslintrc: Option<String>,
    #[serde(rename = "eslintIgnore")]
    pub eslint_ignore: Option<String>,
    #[serde(rename = "phpcsStandard")]
    pub phpcs_standard: Option<String>,
}

impl CoderSettings {
    /// ESLint overrides with legacy flat keys filling absent entries.
    pub fn eslint_overrides(&self) -> LinterOverrides {
        let mut ov = self.eslint.clone().unwrap_or_default();
        if ov.config.is_none() {
            ov.config = self.eslintrc.clone();
        }
        if ov.ignore.is_none() {
            ov.ignore = self.eslint_ignore.clone();
        }
        ov
    }

    /// PHPCS overrides with the legacy `phpcsStandard` key as fallback.
    pub fn phpcs_overrides(&self) -> LinterOverrides {
        let mut ov = self
            .phpcs
            .as_ref()
            .map(|p| p.linter.clone())
            .unwrap_or_default();
        if ov.config.is_none() {
            ov.config = self.phpcs_standard.clone();
        }
        ov
    }
}

#[derive(Deserialize)]
struct AquiferProject {
    #[serde(default)]
    extensions: HashMap<String, AquiferExtension>,
}

#[derive(Deserialize)]
struct AquiferExtension {
    #[serde(default)]
    config: Option<CoderSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Resolved settings for one linter domain.
pub struct LinterConfig {
    /// Rule-set file (ESLint) or coding standard (PHPCS).
    pub config_path: PathBuf,
    pub ignore_path: Option<PathBuf>,
    /// Project-relative directories, files, or root-level patterns.
    pub targets: Vec<String>,
    /// Allowed suffixes, without the leading dot.
    pub extensions: BTreeSet<String>,
}

impl LinterConfig {
    pub fn eslint_defaults(plugin_dir: &Path) -> Self {
        let mut targets: Vec<String> = DRUPAL_CODE_DIRS.iter().map(|d| d.to_string()).collect();
        targets.push("*.js".to_string());
        Self {
            config_path: plugin_dir.join("src").join(".eslintrc"),
            ignore_path: Some(plugin_dir.join("src").join(".eslintignore")),
            targets,
            extensions: BTreeSet::from(["js".to_string()]),
        }
    }

    pub fn phpcs_defaults(plugin_dir: &Path) -> Self {
        Self {
            config_path: plugin_dir.join("vendor/drupalmodule/coder/coder_sniffer/Drupal"),
            ignore_path: None,
            targets: DRUPAL_CODE_DIRS.iter().map(|d| d.to_string()).collect(),
            extensions: DRUPAL_PHP_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Whether `path` carries one of the allowed extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.') == ext)
    }

    /// Extensions without leading dots, in set order.
    pub fn extension_list(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect()
    }
}

/// Merge project overrides onto built-in defaults.
///
/// Keys present in `overrides` replace the default wholesale; lists are never
/// concatenated. Relative override paths resolve against `project_root`, and
/// an empty `ignore` disables the default ignore file. Nothing is validated
/// here.
pub fn merge(defaults: LinterConfig, overrides: &LinterOverrides, project_root: &Path) -> LinterConfig {
    let config_path = overrides
        .config
        .as_deref()
        .map(|p| project_root.join(p))
        .unwrap_or(defaults.config_path);
    let ignore_path = match overrides.ignore.as_deref() {
        Some("") => None,
        Some(p) => Some(project_root.join(p)),
        None => defaults.ignore_path,
    };
    let targets = overrides.targets.clone().unwrap_or(defaults.targets);
    let extensions = overrides
        .extensions
        .as_ref()
        .map(|e| e.iter().cloned().collect())
        .unwrap_or(defaults.extensions);
    LinterConfig {
        config_path,
        ignore_path,
        targets,
        extensions,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Executables invoked by the linter passes.
pub struct Tools {
    pub eslint: String,
    pub php: String,
    pub phpcs: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Command-level behavior resolved from `[lint]`.
pub struct LintPolicy {
    pub unsupported_target: UnsupportedTarget,
    pub fail_on_violations: bool,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub project_root: PathBuf,
    pub plugin_dir: PathBuf,
    /// Settings file that was loaded, if any.
    pub settings_path: Option<PathBuf>,
    pub output: String,
    pub eslint: LinterConfig,
    pub phpcs: LinterConfig,
    pub strip_advertisement: bool,
    pub tools: Tools,
    pub policy: LintPolicy,
}

/// Walk upward from `start` to detect the project root.
///
/// Stops when a settings file, an `aquifer.json`, or a `.git` directory is
/// found.
pub fn detect_project_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if SETTINGS_FILES.iter().any(|f| cur.join(f).exists())
            || cur.join(AQUIFER_PROJECT_FILE).exists()
            || cur.join(".git").exists()
        {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `CoderSettings` from the first settings source present in `root`.
///
/// Returns the file the settings came from. A file that exists but does not
/// parse is an error.
pub fn load_settings(root: &Path) -> Result<Option<(PathBuf, CoderSettings)>> {
    for name in SETTINGS_FILES {
        let path = root.join(name);
        if !path.is_file() {
            continue;
        }
        let s = fs::read_to_string(&path)?;
        let parsed = if name.ends_with(".toml") {
            toml::from_str::<CoderSettings>(&s).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<CoderSettings>(&s).map_err(|e| e.to_string())
        };
        let cfg = parsed.map_err(|message| CoderError::Config {
            path: path.clone(),
            message,
        })?;
        return Ok(Some((path, cfg)));
    }
    let project = root.join(AQUIFER_PROJECT_FILE);
    if project.is_file() {
        let s = fs::read_to_string(&project)?;
        let parsed: AquiferProject =
            serde_json::from_str(&s).map_err(|e| CoderError::Config {
                path: project.clone(),
                message: e.to_string(),
            })?;
        let cfg = parsed
            .extensions
            .into_iter()
            .find(|(name, _)| name == EXTENSION_NAME)
            .and_then(|(_, ext)| ext.config);
        return Ok(cfg.map(|c| (project, c)));
    }
    Ok(None)
}

/// Locate the plugin installation directory: CLI flag, then
/// `AQUIFER_CODER_HOME`, then the directory holding the executable.
pub fn resolve_plugin_dir(cli_plugin_dir: Option<&str>) -> PathBuf {
    if let Some(dir) = cli_plugin_dir {
        return PathBuf::from(dir);
    }
    if let Some(dir) = std::env::var_os(PLUGIN_DIR_ENV) {
        return PathBuf::from(dir);
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve `Effective` by merging CLI flags, discovered settings, and defaults.
pub fn resolve_effective(
    cli_project_root: Option<&str>,
    cli_plugin_dir: Option<&str>,
    cli_output: Option<&str>,
) -> Result<Effective> {
    let start = fs::canonicalize(cli_project_root.unwrap_or("."))?;
    let project_root = detect_project_root(&start);
    let plugin_dir = resolve_plugin_dir(cli_plugin_dir);
    let (settings_path, cfg) = match load_settings(&project_root)? {
        Some((path, cfg)) => (Some(path), cfg),
        None => (None, CoderSettings::default()),
    };
    Ok(build_effective(project_root, plugin_dir, settings_path, &cfg, cli_output))
}

/// Apply precedence for already-loaded settings.
pub fn build_effective(
    project_root: PathBuf,
    plugin_dir: PathBuf,
    settings_path: Option<PathBuf>,
    cfg: &CoderSettings,
    cli_output: Option<&str>,
) -> Effective {
    let output = cli_output
        .map(|s| s.to_string())
        .or_else(|| cfg.output.clone())
        .unwrap_or_else(|| "human".to_string());

    let eslint = merge(
        LinterConfig::eslint_defaults(&plugin_dir),
        &cfg.eslint_overrides(),
        &project_root,
    );
    let phpcs = merge(
        LinterConfig::phpcs_defaults(&plugin_dir),
        &cfg.phpcs_overrides(),
        &project_root,
    );
    let strip_advertisement = cfg
        .phpcs
        .as_ref()
        .and_then(|p| p.strip_advertisement)
        .unwrap_or(true);

    let tools_cfg = cfg.tools.clone().unwrap_or_default();
    let tools = Tools {
        eslint: tools_cfg.eslint.unwrap_or_else(|| "eslint".to_string()),
        php: tools_cfg.php.unwrap_or_else(|| "php".to_string()),
        phpcs: tools_cfg.phpcs.unwrap_or_else(|| {
            plugin_dir
                .join("vendor/bin/phpcs")
                .to_string_lossy()
                .to_string()
        }),
    };

    let lint_cfg = cfg.lint.clone().unwrap_or_default();
    let policy = LintPolicy {
        unsupported_target: lint_cfg.unsupported_target.unwrap_or_default(),
        fail_on_violations: lint_cfg.fail_on_violations.unwrap_or(true),
    };

    Effective {
        project_root,
        plugin_dir,
        settings_path,
        output,
        eslint,
        phpcs,
        strip_advertisement,
        tools,
        policy,
    }
}
