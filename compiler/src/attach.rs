//! Option values written as separate words in usage lines.
//!
//! `prog [-o FILE] <in>` with `-o FILE` declared under `Options:` means `-o`
//! takes `FILE`, not that `FILE` is a positional argument of its own. Such a
//! pair is folded into one option leaf carrying the placeholder, the same
//! tree `prog [-o=FILE] <in>` compiles to.

use tracing::debug;
use usage_grammar_core::{GrammarError, OptionRef, OptionTable, Pattern, Result, Root};

/// Folds every `OPTION PLACEHOLDER` pair of a usage line into one option leaf.
///
/// # Errors
///
/// [`GrammarError::DetachedOptionValue`] when the placeholder of an option
/// used on this line still appears anywhere else on it, e.g. `[-o] FILE`.
pub fn attach_option_values(usage: Root, options: &OptionTable) -> Result<Root> {
    let children = attach_in(usage.children(), options, true);
    let usage = Root::new(usage.program(), children);
    check_detached(&usage, options)?;
    Ok(usage)
}

fn attach_in(children: &[Pattern], options: &OptionTable, sequence: bool) -> Vec<Pattern> {
    let mut attached = Vec::with_capacity(children.len());
    let mut rest = children.iter().peekable();

    while let Some(child) = rest.next() {
        let child = match child {
            Pattern::Group(group) => Pattern::Group(
                group.with_same_modifiers(attach_in(group.children(), options, group.is_sequence())),
            ),
            Pattern::Option(option) if sequence => {
                let folded = value_placeholder(option, options).and_then(|placeholder| {
                    rest.next_if(|next| matches!(next, Pattern::Argument(name) if name == placeholder))
                        .map(|_| placeholder)
                });
                match folded {
                    Some(placeholder) => {
                        debug!(key = %option.key, value = placeholder, "attached option value");
                        Pattern::Option(OptionRef {
                            key: option.key.clone(),
                            inline_value: Some(placeholder.to_string()),
                        })
                    }
                    None => child.clone(),
                }
            }
            other => other.clone(),
        };
        attached.push(child);
    }
    attached
}

/// The declared placeholder of a value option written without one.
fn value_placeholder<'o>(option: &OptionRef, options: &'o OptionTable) -> Option<&'o str> {
    if option.inline_value.is_some() {
        return None;
    }
    options.get(&option.key)?.value.as_deref()
}

fn check_detached(usage: &Root, options: &OptionTable) -> Result<()> {
    let bare: Vec<(&OptionRef, &str)> = usage
        .option_refs()
        .into_iter()
        .filter_map(|option| value_placeholder(option, options).map(|value| (option, value)))
        .collect();
    if bare.is_empty() {
        return Ok(());
    }

    let mut detached = None;
    usage.walk(&mut |node| {
        if detached.is_some() {
            return;
        }
        if let Pattern::Argument(name) = node {
            detached = bare
                .iter()
                .find(|(_, value)| *value == name.as_str())
                .map(|(option, value)| GrammarError::DetachedOptionValue {
                    key: option.key.clone(),
                    value: value.to_string(),
                    line: usage.to_string(),
                });
        }
    });
    detached.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile_usage;
    use usage_grammar_core::OptionEntry;

    fn table() -> OptionTable {
        let mut options = OptionTable::new();
        options
            .insert(OptionEntry::with_value(&["-o", "--output"], "FILE"))
            .unwrap();
        options.insert(OptionEntry::flag(&["-v"])).unwrap();
        options
    }

    fn attach(line: &str) -> Result<Root> {
        attach_option_values(compile_usage(line).unwrap(), &table())
    }

    #[test]
    fn test_folds_placeholder_after_option() {
        let usage = attach("prog [-o FILE] <in>").unwrap();
        assert_eq!(usage.to_string(), "prog [-o=FILE] <in>");
    }

    #[test]
    fn test_folds_inside_nested_groups() {
        let usage = attach("prog ([--output FILE] | stop) <in>").unwrap();
        assert_eq!(usage.to_string(), "prog ([--output=FILE] | stop) <in>");
    }

    #[test]
    fn test_leaves_other_arguments_alone() {
        assert_eq!(attach("prog -v FILE").unwrap().to_string(), "prog -v FILE");
        let usage = attach("prog -o <out> <in>").unwrap();
        assert_eq!(usage.to_string(), "prog -o <out> <in>");
    }

    #[test]
    fn test_inline_placeholder_is_kept() {
        let usage = attach("prog --output=<path> FILE").unwrap();
        assert_eq!(usage.to_string(), "prog --output=<path> FILE");
    }

    #[test]
    fn test_rejects_placeholder_across_group_boundary() {
        let err = attach("prog [-o] FILE").unwrap_err();
        assert_eq!(
            err,
            GrammarError::DetachedOptionValue {
                key: "-o".to_string(),
                value: "FILE".to_string(),
                line: "prog [-o] FILE".to_string(),
            }
        );
    }
}
