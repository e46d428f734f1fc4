//! Lookup API over the bindings of a successful match.

use std::fmt;

use serde::Serialize;
use usage_grammar_core::{Binding, BindingKind, OptionTable};

/// Ordered bindings of a successful match plus the option table they were
/// resolved against.
///
/// Option lookups accept any synonym of the option: with `-s --speed=<kn>`
/// declared, `values_of("-s")` and `values_of("--speed")` see the same
/// bindings.
///
/// # Examples
///
/// ```
/// use usage_grammar_matcher::interpret;
///
/// let help = "\
/// Usage:
///   naval_fate ship <name> move <x> <y> [--speed=<kn>]
///
/// Options:
///   --speed=<kn>  Speed in knots [default: 10].
/// ";
///
/// let matches = interpret(help, &["naval_fate", "ship", "Guardian", "move", "10", "50"]).unwrap();
/// assert_eq!(matches.program_name(), "naval_fate");
/// assert_eq!(matches.subcommands(), vec!["ship", "move"]);
/// assert_eq!(matches.value_of("<name>"), Some("Guardian"));
/// assert!(!matches.is_present("--speed"));
/// assert_eq!(matches.value_of("--speed"), Some("10"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Matches {
    bindings: Vec<Binding>,
    #[serde(skip)]
    options: OptionTable,
}

impl Matches {
    pub(crate) fn new(bindings: Vec<Binding>, options: OptionTable) -> Self {
        Self { bindings, options }
    }

    /// Bindings in argv order, starting with the program name.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn into_bindings(self) -> Vec<Binding> {
        self.bindings
    }

    /// The program name bound to `argv[0]`.
    pub fn program_name(&self) -> &str {
        self.bindings
            .iter()
            .find(|binding| binding.kind == BindingKind::ProgramName)
            .map_or("", |binding| binding.value.as_str())
    }

    /// Matched command words in argv order.
    pub fn subcommands(&self) -> Vec<&str> {
        self.bindings
            .iter()
            .filter(|binding| binding.kind == BindingKind::Subcommand)
            .map(|binding| binding.value.as_str())
            .collect()
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.subcommands().contains(&name)
    }

    /// Every value bound to `key`, in argv order.
    pub fn values_of(&self, key: &str) -> Vec<&str> {
        self.bindings
            .iter()
            .filter(|binding| self.binds(binding, key))
            .map(|binding| binding.value.as_str())
            .collect()
    }

    /// First value bound to `key`; for an option that was not given, its
    /// declared default.
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.values_of(key)
            .first()
            .copied()
            .or_else(|| self.options.get(key)?.default.as_deref())
    }

    pub fn is_present(&self, key: &str) -> bool {
        self.occurrences(key) > 0
    }

    /// How many times `key` was bound.
    pub fn occurrences(&self, key: &str) -> usize {
        self.bindings
            .iter()
            .filter(|binding| self.binds(binding, key))
            .count()
    }

    fn binds(&self, binding: &Binding, key: &str) -> bool {
        let Some(bound) = binding.key.as_deref() else {
            return false;
        };
        if bound == key {
            return true;
        }
        binding.kind == BindingKind::Option
            && self
                .options
                .slot(bound)
                .is_some_and(|slot| self.options.slot(key) == Some(slot))
    }
}

impl fmt::Display for Matches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for binding in &self.bindings {
            writeln!(f, "{binding}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usage_grammar_core::OptionEntry;

    fn matches() -> Matches {
        let mut options = OptionTable::new();
        options
            .insert(OptionEntry::with_value(&["-s", "--speed"], "<kn>").with_default("10"))
            .unwrap();
        options.insert(OptionEntry::flag(&["-v", "--verbose"])).unwrap();
        Matches::new(
            vec![
                Binding::program_name("prog"),
                Binding::subcommand("go"),
                Binding::argument("<file>", "a"),
                Binding::option("-v", "-v"),
                Binding::argument("<file>", "b"),
                Binding::option("--verbose", "--verbose"),
            ],
            options,
        )
    }

    #[test]
    fn test_program_and_subcommands() {
        let matches = matches();
        assert_eq!(matches.program_name(), "prog");
        assert_eq!(matches.subcommands(), vec!["go"]);
        assert!(matches.has_command("go"));
        assert!(!matches.has_command("stop"));
    }

    #[test]
    fn test_argument_values_in_argv_order() {
        let matches = matches();
        assert_eq!(matches.values_of("<file>"), vec!["a", "b"]);
        assert_eq!(matches.value_of("<file>"), Some("a"));
        assert_eq!(matches.occurrences("<file>"), 2);
    }

    #[test]
    fn test_option_lookup_accepts_any_synonym() {
        let matches = matches();
        assert_eq!(matches.occurrences("-v"), 2);
        assert_eq!(matches.occurrences("--verbose"), 2);
        assert_eq!(matches.values_of("--verbose"), vec!["-v", "--verbose"]);
        assert_eq!(matches.occurrences("--speed"), 0);
    }

    #[test]
    fn test_value_of_falls_back_to_default() {
        let matches = matches();
        assert!(!matches.is_present("-s"));
        assert_eq!(matches.value_of("-s"), Some("10"));
        assert_eq!(matches.value_of("--speed"), Some("10"));
        assert_eq!(matches.value_of("--missing"), None);
    }

    #[test]
    fn test_serializes_bindings_only() {
        let json = serde_json::to_value(matches()).unwrap();
        assert_eq!(json["bindings"][0]["kind"], "program_name");
        assert!(json.get("options").is_none());
    }

    #[test]
    fn test_display_lists_bindings() {
        let rendered = matches().to_string();
        assert!(rendered.starts_with("program - = prog\ncommand go = go\n"));
    }
}
