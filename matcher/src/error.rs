//! Error types for argv matching.

use thiserror::Error;
use usage_grammar_core::GrammarError;

/// Why an argv could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// argv did not even contain a program name.
    #[error("argv is empty, expected at least a program name")]
    EmptyArgv,

    /// No usage line accepts the arguments.
    #[error("arguments do not match any usage line")]
    NoMatch,

    /// The search was cut off by the configured step budget.
    #[error("match search exceeded its budget of {budget} steps")]
    BudgetExhausted { budget: usize },

    /// The help text failed to compile.
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

impl MatchError {
    /// Whether this is the ordinary "argv fits no usage line" outcome.
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch)
    }
}

/// Convenience alias for results with [`MatchError`].
pub type Result<T> = std::result::Result<T, MatchError>;
