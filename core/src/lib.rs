//! Core grammar types for docopt-style usage text.
//!
//! This crate defines the data model shared by the compiler and the matcher:
//!
//! - [`Pattern`]: one node of a compiled usage line: a command word, an
//!   argument placeholder, an option reference, or a [`Group`] with
//!   `optional`/`alternative`/`repeat` modifiers.
//! - [`Root`]: one usage line: the program name plus its pattern sequence.
//! - [`OptionEntry`] / [`OptionTable`]: synonyms, value placeholder and
//!   default of each line of the `Options:` section.
//! - [`Grammar`]: every usage line of a help text plus its option table.
//! - [`Binding`]: one `(kind, key, value)` triple of a match result.
//!
//! Validation ([`validate_grammar`]) checks group arity, option spellings and
//! that every option leaf resolves to a table entry. [`Grammar::new`] refuses
//! to build a grammar that fails it.
//!
//! # Example
//!
//! ```
//! use usage_grammar_core::*;
//!
//! // my_program open <file>...
//! let usage = Root::new(
//!     "my_program",
//!     vec![
//!         Pattern::command("open"),
//!         Pattern::Group(Group::repeat(Pattern::argument("<file>"))),
//!     ],
//! );
//! let grammar = Grammar::new(vec![usage], OptionTable::new()).unwrap();
//!
//! assert_eq!(grammar.usages()[0].to_string(), "my_program open <file>...");
//! assert!(validate_grammar(&grammar).is_empty());
//! ```

mod error;
mod types;
mod validate;

pub use error::{GrammarError, Result};
pub use types::*;
pub use validate::{is_valid_option_key, validate_grammar};
