//! Console helpers shared by the binary and printers.

use owo_colors::OwoColorize;
use std::path::Path;

/// Colors are disabled by `NO_COLOR` and for JSON output.
pub fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn prefix(label: &str, paint: fn(&str) -> String) -> String {
    if use_colors("human") {
        paint(label)
    } else {
        label.to_string()
    }
}

pub fn error_prefix() -> String {
    prefix("error:", |s| s.red().bold().to_string())
}

pub fn warn_prefix() -> String {
    prefix("warning:", |s| s.yellow().bold().to_string())
}

pub fn note_prefix() -> String {
    prefix("note:", |s| s.cyan().bold().to_string())
}

pub fn info_prefix() -> String {
    prefix("info:", |s| s.blue().bold().to_string())
}

/// Render `path` relative to the working directory when both are absolute.
pub fn rel_to_wd(path: &str) -> String {
    let p = Path::new(path);
    if !p.is_absolute() {
        return path.to_string();
    }
    std::env::current_dir()
        .ok()
        .and_then(|wd| pathdiff::diff_paths(p, wd))
        .map(|rel| rel.to_string_lossy().to_string())
        .filter(|rel| !rel.is_empty())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_to_wd() {
        assert_eq!(rel_to_wd("src/a.js"), "src/a.js");
        let wd = std::env::current_dir().unwrap();
        let abs = wd.join("modules/custom/m.module");
        assert_eq!(rel_to_wd(&abs.to_string_lossy()), "modules/custom/m.module");
    }
}
