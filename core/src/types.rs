//! Grammar type definitions for usage pattern modeling.
//!
//! This module defines the data model shared by the compiler and the matcher:
//! the [`Pattern`] tree compiled from each usage line, the [`OptionTable`]
//! compiled from the `Options:` section, and the [`Binding`] triples a
//! successful match produces. Every tree is built bottom-up and is immutable
//! once attached to its parent; child sequences are fixed-size boxed slices.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GrammarError, Result};

/// One node of a compiled usage line.
///
/// Leaves consume argv tokens; [`Group`] nodes combine their children as a
/// sequence, a choice, a repetition, or any of those made optional.
///
/// # Examples
///
/// ```
/// use usage_grammar_core::{Group, Pattern};
///
/// let body = Pattern::Group(Group::optional(vec![
///     Pattern::command("ship"),
///     Pattern::argument("<name>"),
/// ]));
/// assert_eq!(body.to_string(), "[ship <name>]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// Literal word matched verbatim (e.g. `ship`).
    Command(String),
    /// Placeholder binding exactly one token (e.g. `<name>`, `FILE`).
    Argument(String),
    /// Reference to an [`OptionEntry`] by one of its synonyms.
    Option(OptionRef),
    /// Bracketed or parenthesized sub-pattern.
    Group(Group),
}

impl Pattern {
    /// Creates a command leaf.
    pub fn command(name: &str) -> Self {
        Self::Command(name.to_string())
    }

    /// Creates an argument leaf.
    pub fn argument(name: &str) -> Self {
        Self::Argument(name.to_string())
    }

    /// Creates an option leaf without an inline value placeholder.
    pub fn option(key: &str) -> Self {
        Self::Option(OptionRef::new(key))
    }

    /// Calls `visit` on this node and every descendant, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Pattern)) {
        visit(self);
        if let Self::Group(group) = self {
            for child in group.children() {
                child.walk(visit);
            }
        }
    }

    /// Returns `true` for the three token-consuming leaf kinds.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Group(_))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(name) | Self::Argument(name) => f.write_str(name),
            Self::Option(option) => option.fmt(f),
            Self::Group(group) => group.fmt(f),
        }
    }
}

/// An option leaf as spelled in a usage line.
///
/// `--speed=<kn>` is stored as key `--speed` with inline placeholder `<kn>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRef {
    /// Synonym key used to look up the option table entry.
    pub key: String,
    /// Value placeholder written directly after `=` in the usage line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_value: Option<String>,
}

impl OptionRef {
    /// Creates a reference without an inline placeholder.
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            inline_value: None,
        }
    }

    /// Splits a usage word such as `--speed=<kn>` into key and placeholder.
    ///
    /// # Examples
    ///
    /// ```
    /// use usage_grammar_core::OptionRef;
    ///
    /// let option = OptionRef::parse("--speed=<kn>");
    /// assert_eq!(option.key, "--speed");
    /// assert_eq!(option.inline_value.as_deref(), Some("<kn>"));
    ///
    /// let flag = OptionRef::parse("-v");
    /// assert_eq!(flag.key, "-v");
    /// assert!(flag.inline_value.is_none());
    /// ```
    pub fn parse(word: &str) -> Self {
        match word.split_once('=') {
            Some((key, value)) if !value.is_empty() => Self {
                key: key.to_string(),
                inline_value: Some(value.to_string()),
            },
            Some((key, _)) => Self::new(key),
            None => Self::new(word),
        }
    }
}

impl fmt::Display for OptionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inline_value {
            Some(value) => write!(f, "{}={value}", self.key),
            None => f.write_str(&self.key),
        }
    }
}

/// A sub-pattern with independent `optional`, `alternative` and `repeat`
/// modifiers.
///
/// Constructors fix the child sequence at creation; there is no way to append
/// to a group afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    children: Box<[Pattern]>,
    /// The whole group may match zero tokens.
    #[serde(default)]
    pub optional: bool,
    /// Children are mutually exclusive choices.
    #[serde(default)]
    pub alternative: bool,
    /// The single child may match one or more times.
    #[serde(default)]
    pub repeat: bool,
}

impl Group {
    fn with_children(children: Vec<Pattern>) -> Self {
        Self {
            children: children.into_boxed_slice(),
            optional: false,
            alternative: false,
            repeat: false,
        }
    }

    /// Creates a plain sequence group: `( a b )`.
    pub fn sequence(children: Vec<Pattern>) -> Self {
        Self::with_children(children)
    }

    /// Creates an optional sequence group: `[ a b ]`.
    pub fn optional(children: Vec<Pattern>) -> Self {
        Self {
            optional: true,
            ..Self::with_children(children)
        }
    }

    /// Creates a choice group: `( a | b )`.
    pub fn alternative(choices: Vec<Pattern>) -> Self {
        Self {
            alternative: true,
            ..Self::with_children(choices)
        }
    }

    /// Wraps one element in a repeat group: `a...`.
    pub fn repeat(element: Pattern) -> Self {
        Self {
            repeat: true,
            ..Self::with_children(vec![element])
        }
    }

    /// Returns the same group made optional; used for `[ a | b ]`.
    pub fn into_optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Creates a group with the same modifiers over new children.
    pub fn with_same_modifiers(&self, children: Vec<Pattern>) -> Self {
        Self {
            optional: self.optional,
            alternative: self.alternative,
            repeat: self.repeat,
            ..Self::with_children(children)
        }
    }

    /// Whether the children match one after another.
    pub fn is_sequence(&self) -> bool {
        !self.alternative && !self.repeat
    }

    /// Child nodes in declaration order.
    pub fn children(&self) -> &[Pattern] {
        &self.children
    }

    /// The repeated element when this is a well-formed repeat group.
    pub fn repeated(&self) -> Option<&Pattern> {
        match &*self.children {
            [element] if self.repeat => Some(element),
            _ => None,
        }
    }

    fn body(&self) -> String {
        if let Some(element) = self.repeated() {
            return format!("{element}...");
        }
        let separator = if self.alternative { " | " } else { " " };
        self.children
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self.body();
        if self.optional {
            write!(f, "[{body}]")
        } else if self.repeated().is_some() {
            f.write_str(&body)
        } else {
            write!(f, "({body})")
        }
    }
}

/// One compiled usage line: the program name plus the rest of the line.
///
/// # Examples
///
/// ```
/// use usage_grammar_core::{Pattern, Root};
///
/// let root = Root::new(
///     "my_program",
///     vec![Pattern::argument("<host>"), Pattern::argument("<port>")],
/// );
/// assert_eq!(root.program(), "my_program");
/// assert_eq!(root.to_string(), "my_program <host> <port>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    program: String,
    children: Box<[Pattern]>,
}

impl Root {
    /// Creates a root from a program name and its child sequence.
    pub fn new(program: &str, children: Vec<Pattern>) -> Self {
        Self {
            program: program.to_string(),
            children: children.into_boxed_slice(),
        }
    }

    /// Program name the first argv token must equal.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Elements following the program name.
    pub fn children(&self) -> &[Pattern] {
        &self.children
    }

    /// Calls `visit` on every node below the root.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Pattern)) {
        for child in self.children.iter() {
            child.walk(visit);
        }
    }

    /// All option leaves of this line in declaration order.
    pub fn option_refs(&self) -> Vec<&OptionRef> {
        let mut refs = Vec::new();
        self.walk(&mut |node| {
            if let Pattern::Option(option) = node {
                refs.push(option);
            }
        });
        refs
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for child in self.children.iter() {
            write!(f, " {child}")?;
        }
        Ok(())
    }
}

/// One entry of the `Options:` section.
///
/// An entry without a value placeholder is a boolean flag.
///
/// # Examples
///
/// ```
/// use usage_grammar_core::OptionEntry;
///
/// let output = OptionEntry::with_value(&["-o", "--output"], "FILE")
///     .with_default("out.txt");
/// assert!(output.takes_value());
/// assert!(output.matches("-o"));
/// assert_eq!(output.canonical_key(), "--output");
/// assert_eq!(output.default.as_deref(), Some("out.txt"));
///
/// let verbose = OptionEntry::flag(&["--verbose"]);
/// assert!(!verbose.takes_value());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    /// Short and/or long spellings (e.g. `-o`, `--output`).
    pub synonyms: Vec<String>,
    /// Value placeholder name (e.g. `FILE`); absent for boolean flags.
    pub value: Option<String>,
    /// Value from a `[default: ...]` annotation.
    pub default: Option<String>,
    /// Free-text description following the flag spec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OptionEntry {
    /// Creates a boolean flag entry.
    pub fn flag(synonyms: &[&str]) -> Self {
        Self {
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
            value: None,
            default: None,
            description: None,
        }
    }

    /// Creates an entry taking a value.
    pub fn with_value(synonyms: &[&str], placeholder: &str) -> Self {
        Self {
            value: Some(placeholder.to_string()),
            ..Self::flag(synonyms)
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Whether the option consumes a value token.
    pub fn takes_value(&self) -> bool {
        self.value.is_some()
    }

    /// Checks if `key` is one of this entry's synonyms.
    pub fn matches(&self, key: &str) -> bool {
        self.synonyms.iter().any(|s| s == key)
    }

    /// Returns the canonical key (first long spelling, falls back to the
    /// first synonym).
    pub fn canonical_key(&self) -> &str {
        self.synonyms
            .iter()
            .find(|s| s.starts_with("--"))
            .or_else(|| self.synonyms.first())
            .map(String::as_str)
            .unwrap_or("unknown")
    }
}

impl fmt::Display for OptionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.synonyms.join(", "))?;
        if let Some(value) = &self.value {
            write!(f, " {value}")?;
        }
        if let Some(default) = &self.default {
            write!(f, "  [default: {default}]")?;
        }
        Ok(())
    }
}

/// Option entries indexed by every synonym.
///
/// Read-only once compilation finishes; lookups are by any synonym key.
///
/// # Examples
///
/// ```
/// use usage_grammar_core::{GrammarError, OptionEntry, OptionTable};
///
/// let mut table = OptionTable::new();
/// table.insert(OptionEntry::flag(&["-h", "--help"])).unwrap();
/// assert!(table.get("-h").is_some());
/// assert_eq!(table.get("--help").unwrap().canonical_key(), "--help");
///
/// let clash = table.insert(OptionEntry::flag(&["--help"]));
/// assert_eq!(clash, Err(GrammarError::DuplicateOption("--help".into())));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<OptionEntry>", try_from = "Vec<OptionEntry>")]
pub struct OptionTable {
    entries: Vec<OptionEntry>,
    index: HashMap<String, usize>,
}

impl OptionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, rejecting synonyms already claimed by another entry.
    pub fn insert(&mut self, entry: OptionEntry) -> Result<()> {
        let mut seen = Vec::with_capacity(entry.synonyms.len());
        for key in &entry.synonyms {
            if self.index.contains_key(key) || seen.contains(&key) {
                return Err(GrammarError::DuplicateOption(key.clone()));
            }
            seen.push(key);
        }
        let slot = self.entries.len();
        for key in &entry.synonyms {
            self.index.insert(key.clone(), slot);
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Looks an entry up by any of its synonyms.
    pub fn get(&self, key: &str) -> Option<&OptionEntry> {
        self.index.get(key).map(|&slot| &self.entries[slot])
    }

    /// Declaration index of the entry owning `key`; every synonym of one
    /// entry maps to the same index.
    pub fn slot(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Checks whether some entry declares `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<OptionTable> for Vec<OptionEntry> {
    fn from(table: OptionTable) -> Self {
        table.entries
    }
}

impl TryFrom<Vec<OptionEntry>> for OptionTable {
    type Error = GrammarError;

    fn try_from(entries: Vec<OptionEntry>) -> Result<Self> {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry)?;
        }
        Ok(table)
    }
}

/// A compiled help text: one [`Root`] per usage line plus the option table.
///
/// Construction validates the whole grammar, so a `Grammar` value always
/// satisfies the structural invariants checked by
/// [`validate_grammar`](crate::validate_grammar). It is immutable and can be
/// shared across threads for concurrent matching.
///
/// # Examples
///
/// ```
/// use usage_grammar_core::{Grammar, GrammarError, OptionEntry, OptionTable, Pattern, Root};
///
/// let mut options = OptionTable::new();
/// options.insert(OptionEntry::flag(&["-v", "--verbose"])).unwrap();
///
/// let usage = Root::new("tool", vec![Pattern::option("--verbose")]);
/// let grammar = Grammar::new(vec![usage], options).unwrap();
/// assert_eq!(grammar.program_names(), vec!["tool"]);
///
/// let unresolved = Grammar::new(
///     vec![Root::new("tool", vec![Pattern::option("--quiet")])],
///     OptionTable::new(),
/// );
/// assert!(matches!(unresolved, Err(GrammarError::UnresolvedOption { .. })));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grammar {
    usages: Vec<Root>,
    options: OptionTable,
}

impl Grammar {
    /// Builds a grammar, rejecting it if any structural invariant fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`GrammarError`] reported by
    /// [`validate_grammar`](crate::validate_grammar).
    pub fn new(usages: Vec<Root>, options: OptionTable) -> Result<Self> {
        let grammar = Self { usages, options };
        match crate::validate::validate_grammar(&grammar).into_iter().next() {
            Some(error) => Err(error),
            None => Ok(grammar),
        }
    }

    /// Usage lines in declaration order.
    pub fn usages(&self) -> &[Root] {
        &self.usages
    }

    /// The option table.
    pub fn options(&self) -> &OptionTable {
        &self.options
    }

    /// Program names of all usage lines, deduplicated, in declaration order.
    pub fn program_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for usage in &self.usages {
            if !names.contains(&usage.program()) {
                names.push(usage.program());
            }
        }
        names
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Usage:")?;
        for usage in &self.usages {
            writeln!(f, "  {usage}")?;
        }
        if !self.options.is_empty() {
            writeln!(f)?;
            writeln!(f, "Options:")?;
            for entry in self.options.iter() {
                writeln!(f, "  {entry}")?;
            }
        }
        Ok(())
    }
}

/// Kind of a [`Binding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// `argv[0]` bound to the usage line's program name.
    ProgramName,
    /// A command word matched verbatim.
    Subcommand,
    /// A positional placeholder and the token it took.
    Argument,
    /// An option and its value (the flag token itself for boolean flags).
    Option,
}

impl BindingKind {
    /// Short lowercase name used in text output.
    pub fn label(self) -> &'static str {
        match self {
            Self::ProgramName => "program",
            Self::Subcommand => "command",
            Self::Argument => "argument",
            Self::Option => "option",
        }
    }
}

/// One resolved `(kind, key, value)` triple of a match.
///
/// # Examples
///
/// ```
/// use usage_grammar_core::{Binding, BindingKind};
///
/// let binding = Binding::argument("<host>", "localhost");
/// assert_eq!(binding.kind, BindingKind::Argument);
/// assert_eq!(binding.key.as_deref(), Some("<host>"));
///
/// let program = Binding::program_name("my_program");
/// assert!(program.key.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub kind: BindingKind,
    /// Pattern key; absent for the program name.
    pub key: Option<String>,
    /// The argv token (or option value) consumed.
    pub value: String,
}

impl Binding {
    pub fn program_name(value: &str) -> Self {
        Self {
            kind: BindingKind::ProgramName,
            key: None,
            value: value.to_string(),
        }
    }

    pub fn subcommand(name: &str) -> Self {
        Self {
            kind: BindingKind::Subcommand,
            key: Some(name.to_string()),
            value: name.to_string(),
        }
    }

    pub fn argument(key: &str, value: &str) -> Self {
        Self {
            kind: BindingKind::Argument,
            key: Some(key.to_string()),
            value: value.to_string(),
        }
    }

    pub fn option(key: &str, value: &str) -> Self {
        Self {
            kind: BindingKind::Option,
            key: Some(key.to_string()),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} = {}",
            self.kind.label(),
            self.key.as_deref().unwrap_or("-"),
            self.value
        )
    }
}
