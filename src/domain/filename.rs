//! Output filename resolution.
//!
//! Order: explicit filename field, then an in-turn "save as X" phrase, then
//! a timestamp default. The extension is always forced to match the resolved
//! format, overriding whatever the caller supplied.

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

use super::chart::OutputFormat;

/// "save as X" / "sla ... op als X" phrases.
static SAVE_AS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:save (?:it |this |that )?as|sla (?:het |dit |deze )?op als|opslaan als)\s+([\w.\-]+)")
        .unwrap()
});

/// Resolve the output file stem + extension for one render.
pub fn resolve_filename(
    explicit: Option<&str>,
    turn_text: &str,
    format: OutputFormat,
    now: DateTime<Local>,
) -> String {
    let stem = explicit
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .or_else(|| save_as_phrase(turn_text))
        .unwrap_or_else(|| format!("chart-{}", now.format("%Y%m%d%H%M%S")));

    format!("{}.{}", strip_extension(&stem), format.extension())
}

/// Extract the target name from a "save as" phrase, if present.
fn save_as_phrase(text: &str) -> Option<String> {
    SAVE_AS_PATTERN
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// Drop a known chart extension so the format's extension can be forced.
fn strip_extension(stem: &str) -> &str {
    for extension in [".png", ".svg"] {
        if let Some(bare) = stem.strip_suffix(extension) {
            return bare;
        }
    }
    stem
}
