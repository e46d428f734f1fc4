//! Usage-line compiler.
//!
//! A usage line is compiled by recursive descent over [`Scanner`] words. Each
//! bracketed body is collected in full (elements plus `|` separators) before
//! the group is built, so a body is committed to sequence or alternative
//! exactly once.

use tracing::debug;
use usage_grammar_core::{GrammarError, Group, OptionRef, Pattern, Result, Root};

use crate::scanner::{Bracket, Scanner, Word};

/// Compiles one usage line such as `naval_fate ship new <name>...`.
///
/// # Errors
///
/// Returns a [`GrammarError`] carrying the line text when the line has no
/// program name, unbalanced brackets, an empty or multi-element `|` branch,
/// or a `...` with nothing before it.
///
/// # Examples
///
/// ```
/// use usage_grammar_compiler::compile_usage;
///
/// let root = compile_usage("naval_fate mine (set|remove) <x> <y> [--moored|--drifting]").unwrap();
/// assert_eq!(root.program(), "naval_fate");
/// assert_eq!(
///     root.to_string(),
///     "naval_fate mine (set | remove) <x> <y> [--moored | --drifting]"
/// );
/// ```
pub fn compile_usage(line: &str) -> Result<Root> {
    let line = line.trim();
    let mut parser = UsageParser {
        scanner: Scanner::new(line),
        line,
    };

    let program = match parser.scanner.next_word() {
        Some(Word::Text(word)) if !word.starts_with('-') => word,
        _ => {
            return Err(GrammarError::MissingProgramName {
                line: line.to_string(),
            });
        }
    };

    let children = match parser.parse_body(None)? {
        Body::Sequence(elements) => elements,
        Body::Alternatives(choices) => vec![Pattern::Group(Group::alternative(choices))],
    };
    let root = Root::new(program, children);
    debug!(program, pattern = %root, "compiled usage line");
    Ok(root)
}

/// Classifies a bare usage word as an option, argument or command leaf.
///
/// # Examples
///
/// ```
/// use usage_grammar_compiler::usage::classify_word;
/// use usage_grammar_core::Pattern;
///
/// assert_eq!(classify_word("<name>"), Pattern::argument("<name>"));
/// assert_eq!(classify_word("FILE"), Pattern::argument("FILE"));
/// assert_eq!(classify_word("ship"), Pattern::command("ship"));
/// assert_eq!(classify_word("-h"), Pattern::option("-h"));
/// ```
pub fn classify_word(word: &str) -> Pattern {
    if is_option_word(word) {
        Pattern::Option(OptionRef::parse(word))
    } else if is_argument_word(word) {
        Pattern::argument(word)
    } else {
        Pattern::command(word)
    }
}

fn is_option_word(word: &str) -> bool {
    word.starts_with('-') && word != "-" && word != "--"
}

fn is_argument_word(word: &str) -> bool {
    let angle = word.len() > 2 && word.starts_with('<') && word.ends_with('>');
    angle || is_uppercase_word(word)
}

fn is_uppercase_word(word: &str) -> bool {
    word.chars().next().is_some_and(|ch| ch.is_ascii_uppercase())
        && word
            .chars()
            .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_' || ch == '-')
}

/// A fully collected bracket body.
enum Body {
    Sequence(Vec<Pattern>),
    Alternatives(Vec<Pattern>),
}

struct UsageParser<'a> {
    scanner: Scanner<'a>,
    line: &'a str,
}

impl UsageParser<'_> {
    fn parse_body(&mut self, closer: Option<Bracket>) -> Result<Body> {
        let mut branches: Vec<Vec<Pattern>> = Vec::new();
        let mut current: Vec<Pattern> = Vec::new();

        loop {
            let Some(word) = self.scanner.next_word() else {
                if let Some(bracket) = closer {
                    return Err(GrammarError::UnclosedGroup {
                        open: bracket.open(),
                        line: self.line.to_string(),
                    });
                }
                break;
            };

            match word {
                Word::Close(bracket) if Some(bracket) == closer => break,
                Word::Close(bracket) => {
                    return Err(GrammarError::UnexpectedClose {
                        close: bracket.close(),
                        line: self.line.to_string(),
                    });
                }
                Word::Open(bracket) => {
                    let group = self.parse_group(bracket)?;
                    current.push(Pattern::Group(group));
                }
                Word::Bar => {
                    if current.is_empty() {
                        return Err(self.empty_branch());
                    }
                    branches.push(std::mem::take(&mut current));
                }
                Word::Ellipsis => {
                    let element = current.pop().ok_or_else(|| GrammarError::DanglingEllipsis {
                        line: self.line.to_string(),
                    })?;
                    current.push(Pattern::Group(Group::repeat(element)));
                }
                Word::Text(text) => current.push(classify_word(text)),
            }
        }

        if branches.is_empty() {
            return Ok(Body::Sequence(current));
        }
        if current.is_empty() {
            return Err(self.empty_branch());
        }
        branches.push(current);

        let mut choices = Vec::with_capacity(branches.len());
        for branch in branches {
            let [choice]: [Pattern; 1] =
                branch
                    .try_into()
                    .map_err(|_| GrammarError::MixedAlternation {
                        line: self.line.to_string(),
                    })?;
            choices.push(choice);
        }
        Ok(Body::Alternatives(choices))
    }

    fn parse_group(&mut self, bracket: Bracket) -> Result<Group> {
        let body = self.parse_body(Some(bracket))?;
        let group = match (bracket, body) {
            (Bracket::Paren, Body::Sequence(elements)) => Group::sequence(elements),
            (Bracket::Paren, Body::Alternatives(choices)) => Group::alternative(choices),
            (Bracket::Square, Body::Sequence(elements)) => Group::optional(elements),
            (Bracket::Square, Body::Alternatives(choices)) => {
                Group::alternative(choices).into_optional()
            }
        };
        Ok(group)
    }

    fn empty_branch(&self) -> GrammarError {
        GrammarError::EmptyBranch {
            line: self.line.to_string(),
        }
    }
}
