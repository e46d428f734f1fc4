//! Compile docopt-style help text into a usage grammar.
//!
//! The help text's `Usage:` section becomes one [`Root`] pattern tree per
//! line, and its `Options:` section becomes the [`OptionTable`]. The result is
//! a validated, immutable [`Grammar`] ready for matching.
//!
//! # Main entry points
//!
//! - [`compile_help`]: compile a whole help text with default settings.
//! - [`compile_help_with_config`]: same, with a [`CompileConfig`].
//! - [`compile_usage`] / [`compile_option`]: compile a single line.
//!
//! # Example
//!
//! ```
//! use usage_grammar_compiler::compile_help;
//!
//! let help = "\
//! Usage:
//!   my_program open <file>...
//!   my_program -h | --help
//!
//! Options:
//!   -h --help  Show this screen.
//! ";
//!
//! let grammar = compile_help(help).unwrap();
//! assert_eq!(grammar.usages().len(), 2);
//! assert_eq!(grammar.usages()[0].to_string(), "my_program open <file>...");
//! assert!(grammar.options().get("-h").is_some());
//! ```
//!
//! [`Root`]: usage_grammar_core::Root
//! [`OptionTable`]: usage_grammar_core::OptionTable

pub mod attach;
pub mod config;
pub mod normalize;
pub mod options;
pub mod scanner;
pub mod sections;
pub mod usage;

pub use attach::attach_option_values;
pub use config::{CompileConfig, DEFAULT_MAX_SYNONYMS};
pub use normalize::normalize_help_text;
pub use options::{compile_option, compile_option_with_limit};
pub use sections::{HelpSections, SectionLine, split_sections};
pub use usage::compile_usage;

use tracing::debug;
use usage_grammar_core::{Grammar, GrammarError, OptionEntry, OptionTable, Result, Root};

/// Compiles a help text with default settings.
///
/// # Errors
///
/// Returns the first [`GrammarError`] found; see [`compile_help_with_config`].
pub fn compile_help(help: &str) -> Result<Grammar> {
    compile_help_with_config(help, &CompileConfig::default())
}

/// Compiles a help text into a validated [`Grammar`].
///
/// Options named in usage lines are declared implicitly when the text has no
/// `Options:` section and `config.strict_options` is off. A declared option
/// written apart from its placeholder (`-o FILE`) takes that placeholder as
/// its value.
///
/// # Errors
///
/// Fails on a missing or empty usage section, on any malformed usage or
/// option line, and on a grammar that violates its structural invariants
/// (for example a usage option absent from the option table).
///
/// # Examples
///
/// ```
/// use usage_grammar_compiler::{CompileConfig, compile_help_with_config};
/// use usage_grammar_core::GrammarError;
///
/// let help = "Usage:\n  prog [--verbose]\n";
///
/// let lenient = compile_help_with_config(help, &CompileConfig::default()).unwrap();
/// assert!(lenient.options().contains("--verbose"));
///
/// let strict = CompileConfig { strict_options: true, ..CompileConfig::default() };
/// assert!(matches!(
///     compile_help_with_config(help, &strict),
///     Err(GrammarError::UnresolvedOption { .. })
/// ));
/// ```
pub fn compile_help_with_config(help: &str, config: &CompileConfig) -> Result<Grammar> {
    let normalized = normalize_help_text(help);
    let sections = split_sections(&normalized)?;

    if !sections.has_usage_header {
        return Err(GrammarError::MissingUsageSection);
    }
    if sections.usage.is_empty() {
        return Err(GrammarError::EmptyUsageSection);
    }

    let usages = sections
        .usage
        .iter()
        .map(|line| compile_usage(&line.text))
        .collect::<Result<Vec<_>>>()?;

    let mut options = OptionTable::new();
    for line in &sections.options {
        options.insert(compile_option_with_limit(&line.text, config.max_synonyms)?)?;
    }
    if !sections.has_options_header && !config.strict_options {
        declare_implicit_options(&usages, &mut options)?;
    }
    let usages = usages
        .into_iter()
        .map(|usage| attach_option_values(usage, &options))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        usages = usages.len(),
        options = options.len(),
        "compiled help text"
    );
    Grammar::new(usages, options)
}

fn declare_implicit_options(usages: &[Root], options: &mut OptionTable) -> Result<()> {
    let mut implicit: Vec<OptionEntry> = Vec::new();
    for usage in usages {
        for option in usage.option_refs() {
            match implicit.iter_mut().find(|entry| entry.matches(&option.key)) {
                Some(entry) => {
                    if entry.value.is_none() {
                        entry.value = option.inline_value.clone();
                    }
                }
                None => {
                    let mut entry = OptionEntry::flag(&[option.key.as_str()]);
                    entry.value = option.inline_value.clone();
                    implicit.push(entry);
                }
            }
        }
    }

    for entry in implicit {
        debug!(
            key = entry.canonical_key(),
            takes_value = entry.takes_value(),
            "declared implicit option"
        );
        options.insert(entry)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_usage_section() {
        assert_eq!(
            compile_help("Just prose.\n").unwrap_err(),
            GrammarError::MissingUsageSection
        );
    }

    #[test]
    fn test_empty_usage_section() {
        assert_eq!(
            compile_help("Usage:\n\n").unwrap_err(),
            GrammarError::EmptyUsageSection
        );
    }

    #[test]
    fn test_implicit_option_takes_value_when_any_occurrence_has_placeholder() {
        let help = "Usage:\n  prog go [--speed]\n  prog stop [--speed=<kn>]\n";
        let grammar = compile_help(help).unwrap();
        let entry = grammar.options().get("--speed").unwrap();
        assert_eq!(entry.value.as_deref(), Some("<kn>"));
    }

    #[test]
    fn test_declared_options_section_disables_implicit_options() {
        let help = "Usage:\n  prog [-q]\n\nOptions:\n  -v  Verbose.\n";
        assert_eq!(
            compile_help(help).unwrap_err(),
            GrammarError::UnresolvedOption {
                key: "-q".to_string()
            }
        );
    }

    #[test]
    fn test_max_synonyms_is_configurable() {
        let help = "Usage:\n  prog [-a]\n\nOptions:\n  -a -b -c  Letters.\n";
        let config = CompileConfig {
            max_synonyms: 2,
            ..CompileConfig::default()
        };
        assert!(matches!(
            compile_help_with_config(help, &config).unwrap_err(),
            GrammarError::TooManySynonyms { max: 2, .. }
        ));
        assert!(compile_help(help).is_ok());
    }

    #[test]
    fn test_separate_placeholder_becomes_option_value() {
        let help = "Usage:\n  prog [-o FILE] <in>\n\nOptions:\n  -o FILE  Output.\n";
        let grammar = compile_help(help).unwrap();
        assert_eq!(grammar.usages()[0].to_string(), "prog [-o=FILE] <in>");

        let detached = "Usage:\n  prog [-o] FILE\n\nOptions:\n  -o FILE  Output.\n";
        assert!(matches!(
            compile_help(detached).unwrap_err(),
            GrammarError::DetachedOptionValue { key, .. } if key == "-o"
        ));
    }

    #[test]
    fn test_duplicate_synonym_across_lines() {
        let help = "Usage:\n  prog [-v]\n\nOptions:\n  -v  Verbose.\n  -v --version  Version.\n";
        assert_eq!(
            compile_help(help).unwrap_err(),
            GrammarError::DuplicateOption("-v".to_string())
        );
    }
}
