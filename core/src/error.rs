//! Error types for grammar compilation.
//!
//! Every variant is fatal to compilation and is reported before any matching
//! is attempted. Variants raised while compiling a specific line carry that
//! line's text.

use thiserror::Error;

/// Malformed help text, usage line, option line, or grammar structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// The help text has no `Usage:` header.
    #[error("help text has no usage section")]
    MissingUsageSection,

    /// A `Usage:` header is followed directly by a blank line.
    #[error("usage section is empty")]
    EmptyUsageSection,

    /// A pattern written on the `Usage:` header line itself.
    #[error("usage patterns on the header line are not supported: {0}")]
    InlineUsagePattern(String),

    /// The usage line does not start with a bare program-name word.
    #[error("usage line does not start with a program name: {line}")]
    MissingProgramName { line: String },

    /// `[` or `(` without its closer.
    #[error("unclosed '{open}' in usage line: {line}")]
    UnclosedGroup { open: char, line: String },

    /// `]` or `)` with no matching opener.
    #[error("unexpected '{close}' in usage line: {line}")]
    UnexpectedClose { close: char, line: String },

    /// `...` with no element before it.
    #[error("'...' has no preceding element in usage line: {line}")]
    DanglingEllipsis { line: String },

    /// `|` with nothing on one of its sides.
    #[error("empty alternative branch in usage line: {line}")]
    EmptyBranch { line: String },

    /// A `|` separated branch holding more than one element.
    #[error("alternative branch holds several elements, wrap it in parentheses: {line}")]
    MixedAlternation { line: String },

    /// An options-section line that does not start with `-`.
    #[error("option line must start with '-': {line}")]
    NotAnOptionLine { line: String },

    /// A flag spelling that is neither `-x` nor `--name`.
    #[error("invalid option spelling '{key}' in line: {line}")]
    InvalidOptionKey { key: String, line: String },

    /// More synonyms on one option line than the configured bound.
    #[error("option line declares more than {max} synonyms: {line}")]
    TooManySynonyms { max: usize, line: String },

    /// Two option entries claim the same spelling.
    #[error("duplicate option synonym: {0}")]
    DuplicateOption(String),

    /// A usage line references an option the table does not declare.
    #[error("option {key} is not declared in the options section")]
    UnresolvedOption { key: String },

    /// `--flag=<value>` in a usage line for an option that takes no value.
    #[error("option {key} takes no value but usage writes {key}={value}")]
    UnexpectedOptionValue { key: String, value: String },

    /// A usage line names an option's value placeholder away from the option.
    #[error("'{value}' is the value of option {key} but is not written right after it: {line}")]
    DetachedOptionValue {
        key: String,
        value: String,
        line: String,
    },

    /// A choice group with fewer than two choices.
    #[error("alternative group needs at least two choices: {0}")]
    AlternativeArity(String),

    /// A repeat group not wrapping exactly one element.
    #[error("repeat group must wrap exactly one element: {0}")]
    RepeatArity(String),
}

/// Convenience alias for results with [`GrammarError`].
pub type Result<T> = std::result::Result<T, GrammarError>;
