//! Match argv against a compiled usage grammar.
//!
//! [`match_argv`] tries each usage line of a [`Grammar`] in declaration order
//! and returns the bindings of the first line that consumes every argument.
//! [`interpret`] compiles a help text and matches in one call.
//!
//! Matching never mutates the grammar, so one compiled grammar can serve any
//! number of concurrent calls.
//!
//! # Example
//!
//! ```
//! use usage_grammar_compiler::compile_help;
//! use usage_grammar_core::Binding;
//! use usage_grammar_matcher::match_argv;
//!
//! let grammar = compile_help("Usage:\n  my_program <host> <port>\n").unwrap();
//! let matches = match_argv(&grammar, &["my_program", "localhost", "8080"]).unwrap();
//! assert_eq!(
//!     matches.bindings(),
//!     &[
//!         Binding::program_name("my_program"),
//!         Binding::argument("<host>", "localhost"),
//!         Binding::argument("<port>", "8080"),
//!     ]
//! );
//! ```

mod config;
mod engine;
mod error;
mod matches;

pub use config::MatchConfig;
pub use error::{MatchError, Result};
pub use matches::Matches;

use tracing::debug;
use usage_grammar_compiler::{CompileConfig, compile_help_with_config};
use usage_grammar_core::Grammar;

use engine::Engine;

/// Matches argv against a grammar with default settings.
///
/// # Errors
///
/// See [`match_argv_with_config`].
pub fn match_argv<S: AsRef<str>>(grammar: &Grammar, argv: &[S]) -> Result<Matches> {
    match_argv_with_config(grammar, argv, &MatchConfig::default())
}

/// Matches argv against a grammar.
///
/// `argv[0]` selects the usage lines whose program name equals it; the rest
/// is matched against each of them in order.
///
/// # Errors
///
/// - [`MatchError::EmptyArgv`] when `argv` is empty
/// - [`MatchError::NoMatch`] when no usage line accepts the arguments
/// - [`MatchError::BudgetExhausted`] when `config.step_budget` runs out
pub fn match_argv_with_config<S: AsRef<str>>(
    grammar: &Grammar,
    argv: &[S],
    config: &MatchConfig,
) -> Result<Matches> {
    let argv: Vec<&str> = argv.iter().map(|arg| arg.as_ref()).collect();
    let Some((&program, tokens)) = argv.split_first() else {
        return Err(MatchError::EmptyArgv);
    };

    let mut engine = Engine::new(grammar.options(), tokens, config.step_budget);
    for (index, usage) in grammar.usages().iter().enumerate() {
        if usage.program() != program {
            debug!(usage = index, program, "skipping usage line for another program");
            continue;
        }
        match engine.match_root(program, usage)? {
            Some(bindings) => {
                debug!(
                    usage = index,
                    bindings = bindings.len(),
                    steps = engine.steps(),
                    "argv matched usage line"
                );
                return Ok(Matches::new(bindings, grammar.options().clone()));
            }
            None => debug!(usage = index, pattern = %usage, "usage line rejected argv"),
        }
    }

    debug!(steps = engine.steps(), "argv matched no usage line");
    Err(MatchError::NoMatch)
}

/// Compiles `help` and matches `argv` against it.
///
/// # Examples
///
/// ```
/// use usage_grammar_matcher::{MatchError, interpret};
///
/// let help = "Usage:\n  my_program go (--up | --down)\n";
/// let matches = interpret(help, &["my_program", "go", "--up"]).unwrap();
/// assert!(matches.is_present("--up"));
///
/// let err = interpret(help, &["my_program", "go", "--up", "--down"]).unwrap_err();
/// assert_eq!(err, MatchError::NoMatch);
/// ```
pub fn interpret<S: AsRef<str>>(help: &str, argv: &[S]) -> Result<Matches> {
    interpret_with_config(help, argv, &CompileConfig::default(), &MatchConfig::default())
}

/// Compiles `help` with `compile` settings and matches `argv` with `matching`
/// settings.
///
/// # Errors
///
/// [`MatchError::Grammar`] when the help text does not compile, otherwise
/// the errors of [`match_argv_with_config`].
pub fn interpret_with_config<S: AsRef<str>>(
    help: &str,
    argv: &[S],
    compile: &CompileConfig,
    matching: &MatchConfig,
) -> Result<Matches> {
    let grammar = compile_help_with_config(help, compile)?;
    match_argv_with_config(&grammar, argv, matching)
}

#[cfg(test)]
mod tests {
    use super::*;
    use usage_grammar_compiler::compile_help;

    #[test]
    fn test_empty_argv() {
        let grammar = compile_help("Usage:\n  prog\n").unwrap();
        let empty: [&str; 0] = [];
        assert_eq!(match_argv(&grammar, &empty), Err(MatchError::EmptyArgv));
    }

    #[test]
    fn test_program_name_must_match() {
        let grammar = compile_help("Usage:\n  prog run\n").unwrap();
        assert_eq!(
            match_argv(&grammar, &["other", "run"]),
            Err(MatchError::NoMatch)
        );
    }

    #[test]
    fn test_first_matching_usage_line_wins() {
        let grammar = compile_help("Usage:\n  prog <anything>\n  prog run\n").unwrap();
        let matches = match_argv(&grammar, &["prog", "run"]).unwrap();
        assert_eq!(matches.value_of("<anything>"), Some("run"));
        assert!(matches.subcommands().is_empty());
    }

    #[test]
    fn test_lines_for_several_programs() {
        let grammar = compile_help("Usage:\n  git status\n  tig status\n").unwrap();
        let matches = match_argv(&grammar, &["tig", "status"]).unwrap();
        assert_eq!(matches.program_name(), "tig");
    }

    #[test]
    fn test_accepts_owned_strings() {
        let grammar = compile_help("Usage:\n  prog <file>\n").unwrap();
        let argv = vec!["prog".to_string(), "a.txt".to_string()];
        let matches = match_argv(&grammar, &argv).unwrap();
        assert_eq!(matches.value_of("<file>"), Some("a.txt"));
    }

    #[test]
    fn test_interpret_surfaces_grammar_errors() {
        let err = interpret("Usage:\n  prog (a\n", &["prog"]).unwrap_err();
        assert!(matches!(err, MatchError::Grammar(_)));
        assert!(!err.is_no_match());
    }

    #[test]
    fn test_budget_spans_every_usage_line() {
        let help = "Usage:\n  prog [<a>]... [<b>]... one\n  prog [<a>]... [<b>]... two\n";
        let argv = ["prog", "x", "x", "x", "x", "x", "x", "x", "x", "three"];
        let config = MatchConfig::with_step_budget(100);
        let err =
            interpret_with_config(help, &argv, &CompileConfig::default(), &config).unwrap_err();
        assert_eq!(err, MatchError::BudgetExhausted { budget: 100 });
        assert!(interpret(help, &argv).unwrap_err().is_no_match());
    }
}
