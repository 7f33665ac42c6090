//! Post-processing applied to raw tool output before it is parsed.

/// Footer appended by PHP_CodeSniffer 1.x reports advertising 2.0.
pub const PHPCS_UPGRADE_ADVERT: &str = "UPGRADE TO PHP_CODESNIFFER 2.0 TO FIX ERRORS AUTOMATICALLY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A named transformation of raw stdout.
pub enum OutputFilter {
    /// Drop everything from the first occurrence of the marker onwards.
    TruncateAt(&'static str),
}

impl OutputFilter {
    pub fn apply(&self, raw: &str) -> String {
        match self {
            OutputFilter::TruncateAt(marker) => match raw.find(marker) {
                Some(idx) => raw[..idx].to_string(),
                None => raw.to_string(),
            },
        }
    }
}

/// Run `raw` through each filter in order.
pub fn apply_all(filters: &[OutputFilter], raw: &str) -> String {
    filters
        .iter()
        .fold(raw.to_string(), |acc, f| f.apply(&acc))
}

/// Filters for PHPCS output; empty when stripping is disabled.
pub fn phpcs_filters(strip_advertisement: bool) -> Vec<OutputFilter> {
    if strip_advertisement {
        vec![OutputFilter::TruncateAt(PHPCS_UPGRADE_ADVERT)]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_advert_and_trailer() {
        let raw = format!("{{\"files\":{{}}}}\n\n{}\n-----\n", PHPCS_UPGRADE_ADVERT);
        let out = apply_all(&phpcs_filters(true), &raw);
        assert_eq!(out, "{\"files\":{}}\n\n");
    }

    #[test]
    fn test_disabled_filter_passes_output_through() {
        let raw = format!("report\n{}", PHPCS_UPGRADE_ADVERT);
        assert_eq!(apply_all(&phpcs_filters(false), &raw), raw);
    }
}
