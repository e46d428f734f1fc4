//! Help-text normalization.

use regex::Regex;
use std::sync::LazyLock;

/// Strips terminal escapes, converts line endings to `\n` and trims trailing
/// whitespace from every line.
pub fn normalize_help_text(raw: &str) -> String {
    static ANSI_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("static regex must compile"));

    let stripped = ANSI_RE.replace_all(raw, "");
    let replaced = stripped.replace("\r\n", "\n").replace('\r', "\n");

    replaced
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}
