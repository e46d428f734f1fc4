//! Option-line compiler.

use regex::Regex;
use std::sync::LazyLock;

use tracing::debug;
use usage_grammar_core::{GrammarError, OptionEntry, Result, is_valid_option_key};

use crate::config::DEFAULT_MAX_SYNONYMS;
use crate::scanner::OptionScanner;

static DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[default:\s*([^\]]*)\]").expect("static regex must compile")
});

/// Compiles one `Options:` line with the default synonym bound.
///
/// # Examples
///
/// ```
/// use usage_grammar_compiler::compile_option;
///
/// let entry = compile_option("  -o FILE --output=FILE  Write output to FILE.").unwrap();
/// assert_eq!(entry.synonyms, vec!["-o", "--output"]);
/// assert_eq!(entry.value.as_deref(), Some("FILE"));
/// assert_eq!(entry.description.as_deref(), Some("Write output to FILE."));
/// ```
pub fn compile_option(line: &str) -> Result<OptionEntry> {
    compile_option_with_limit(line, DEFAULT_MAX_SYNONYMS)
}

/// Compiles one `Options:` line, allowing at most `max_synonyms` spellings.
///
/// # Errors
///
/// - [`GrammarError::NotAnOptionLine`] when the line does not start with `-`
/// - [`GrammarError::InvalidOptionKey`] for spellings such as `--` or `---x`
/// - [`GrammarError::TooManySynonyms`] when the bound is exceeded
pub fn compile_option_with_limit(line: &str, max_synonyms: usize) -> Result<OptionEntry> {
    let text = line.trim_start();
    if !text.starts_with('-') {
        return Err(GrammarError::NotAnOptionLine {
            line: line.trim().to_string(),
        });
    }

    let mut scanner = OptionScanner::new(text);
    let mut synonyms: Vec<String> = Vec::new();
    let mut placeholder: Option<String> = None;

    while let Some(word) = scanner.next_subword() {
        if word.starts_with('-') {
            if !is_valid_option_key(word) {
                return Err(GrammarError::InvalidOptionKey {
                    key: word.to_string(),
                    line: text.to_string(),
                });
            }
            if synonyms.len() == max_synonyms {
                return Err(GrammarError::TooManySynonyms {
                    max: max_synonyms,
                    line: text.to_string(),
                });
            }
            synonyms.push(word.to_string());
        } else if placeholder.is_none() {
            placeholder = Some(word.to_string());
        }
    }

    let description = scanner.description();
    let entry = OptionEntry {
        synonyms,
        value: placeholder,
        default: parse_default(description),
        description: (!description.is_empty()).then(|| description.to_string()),
    };
    debug!(
        synonyms = ?entry.synonyms,
        value = ?entry.value,
        default = ?entry.default,
        "compiled option line"
    );
    Ok(entry)
}

/// Extracts the value of a `[default: ...]` annotation; the keyword is
/// case-insensitive and an empty value counts as no default.
pub fn parse_default(description: &str) -> Option<String> {
    DEFAULT_RE
        .captures(description)
        .and_then(|caps| caps.get(1))
        .map(|value| value.as_str().trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
