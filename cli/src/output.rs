//! Output formatting for match results and compiled grammars.

use usage_grammar_core::Grammar;
use usage_grammar_matcher::Matches;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// Formats match bindings in the requested output format.
pub fn format_matches(matches: &Matches, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(matches)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(matches).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(matches_to_table(matches)),
    }
}

/// Formats a compiled grammar in the requested output format. The table form
/// is the canonical help text.
pub fn format_grammar(grammar: &Grammar, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(grammar)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(grammar).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(grammar.to_string()),
    }
}

/// The `Usage:` block of a grammar, for error output.
pub fn usage_section(grammar: &Grammar) -> String {
    let mut out = String::from("Usage:\n");
    for usage in grammar.usages() {
        out.push_str(&format!("  {usage}\n"));
    }
    out
}

fn matches_to_table(matches: &Matches) -> String {
    let rows: Vec<(&str, &str, &str)> = matches
        .bindings()
        .iter()
        .map(|binding| {
            (
                binding.kind.label(),
                binding.key.as_deref().unwrap_or("-"),
                binding.value.as_str(),
            )
        })
        .collect();

    let kind_width = rows.iter().map(|row| row.0.len()).max().unwrap_or(0).max(4);
    let key_width = rows.iter().map(|row| row.1.len()).max().unwrap_or(0).max(3);

    let mut out = format!("{:<kind_width$}  {:<key_width$}  VALUE\n", "KIND", "KEY");
    for (kind, key, value) in rows {
        out.push_str(&format!("{kind:<kind_width$}  {key:<key_width$}  {value}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use usage_grammar_compiler::compile_help;
    use usage_grammar_matcher::match_argv;

    fn sample() -> (Grammar, Matches) {
        let grammar = compile_help("Usage:\n  prog open <file>...\n  prog --version\n").unwrap();
        let matches = match_argv(&grammar, &["prog", "open", "a.txt"]).unwrap();
        (grammar, matches)
    }

    #[test]
    fn test_table_aligns_columns() {
        let (_, matches) = sample();
        let table = format_matches(&matches, OutputFormat::Table).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "KIND      KEY     VALUE");
        assert_eq!(lines[1], "program   -       prog");
        assert_eq!(lines[2], "command   open    open");
        assert_eq!(lines[3], "argument  <file>  a.txt");
    }

    #[test]
    fn test_json_lists_bindings() {
        let (_, matches) = sample();
        let json = format_matches(&matches, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["bindings"][2]["key"], "<file>");
        assert_eq!(value["bindings"][2]["value"], "a.txt");
    }

    #[test]
    fn test_grammar_table_is_canonical_text() {
        let (grammar, _) = sample();
        let text = format_grammar(&grammar, OutputFormat::Table).unwrap();
        assert!(text.starts_with("Usage:\n  prog open <file>...\n  prog --version\n"));
        assert!(text.contains("Options:\n  --version\n"));
    }

    #[test]
    fn test_usage_section_omits_options() {
        let (grammar, _) = sample();
        assert_eq!(
            usage_section(&grammar),
            "Usage:\n  prog open <file>...\n  prog --version\n"
        );
    }
}
