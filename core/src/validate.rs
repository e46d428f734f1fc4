//! Grammar validation.
//!
//! Re-checks the structural invariants of a grammar: program names, group
//! arity, option spellings and option resolution. [`Grammar::new`] runs this
//! on every grammar it builds; hand-assembled trees can be checked directly.
//!
//! # Examples
//!
//! ```
//! use usage_grammar_core::*;
//!
//! let mut options = OptionTable::new();
//! options.insert(OptionEntry::flag(&["--moored"])).unwrap();
//! options.insert(OptionEntry::flag(&["--drifting"])).unwrap();
//!
//! let usage = Root::new(
//!     "naval_fate",
//!     vec![Pattern::Group(
//!         Group::alternative(vec![Pattern::option("--moored"), Pattern::option("--drifting")])
//!             .into_optional(),
//!     )],
//! );
//! let grammar = Grammar::new(vec![usage], options).unwrap();
//! assert!(validate_grammar(&grammar).is_empty());
//! ```

use crate::{Grammar, GrammarError, Group, OptionTable, Pattern, Root};

/// Validates a grammar and returns every violation found.
pub fn validate_grammar(grammar: &Grammar) -> Vec<GrammarError> {
    let mut errors = validate_option_spellings(grammar.options());

    for usage in grammar.usages() {
        errors.extend(validate_usage(usage, grammar.options()));
    }

    errors
}

/// Returns `true` for `-x` style and `--name` style spellings.
pub fn is_valid_option_key(key: &str) -> bool {
    match key.strip_prefix("--") {
        Some(long) => !long.is_empty() && !long.starts_with('-'),
        None => key.len() > 1 && key.starts_with('-'),
    }
}

fn validate_option_spellings(options: &OptionTable) -> Vec<GrammarError> {
    let mut errors = Vec::new();
    for entry in options.iter() {
        for key in &entry.synonyms {
            if !is_valid_option_key(key) {
                errors.push(GrammarError::InvalidOptionKey {
                    key: key.clone(),
                    line: entry.to_string(),
                });
            }
        }
    }
    errors
}

fn validate_usage(usage: &Root, options: &OptionTable) -> Vec<GrammarError> {
    let mut errors = Vec::new();

    if usage.program().trim().is_empty() {
        errors.push(GrammarError::MissingProgramName {
            line: usage.to_string(),
        });
        return errors;
    }

    usage.walk(&mut |node| match node {
        Pattern::Group(group) => errors.extend(validate_group(group)),
        Pattern::Option(option) => match options.get(&option.key) {
            None => errors.push(GrammarError::UnresolvedOption {
                key: option.key.clone(),
            }),
            Some(entry) if !entry.takes_value() => {
                if let Some(value) = &option.inline_value {
                    errors.push(GrammarError::UnexpectedOptionValue {
                        key: option.key.clone(),
                        value: value.clone(),
                    });
                }
            }
            Some(_) => {}
        },
        Pattern::Command(_) | Pattern::Argument(_) => {}
    });

    errors
}

fn validate_group(group: &Group) -> Option<GrammarError> {
    if group.repeat && group.repeated().is_none() {
        return Some(GrammarError::RepeatArity(group.to_string()));
    }
    if group.alternative && group.children().len() < 2 {
        return Some(GrammarError::AlternativeArity(group.to_string()));
    }
    None
}
