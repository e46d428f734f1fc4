//! Section splitting for normalized help text.
//!
//! Routes each line to the usage section, the options section, or nowhere.
//! A `Usage:` or `Options:` header (case-insensitive, leading indentation
//! allowed) opens a section; a blank line closes it. Repeated sections are
//! concatenated in text order.

use tracing::{debug, warn};
use usage_grammar_core::{GrammarError, Result};

const USAGE_HEADER: &str = "usage:";
const OPTIONS_HEADER: &str = "options:";

/// A section line with its zero-based line index in the normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLine {
    pub index: usize,
    pub text: String,
}

/// Usage and option lines extracted from a help text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpSections {
    pub usage: Vec<SectionLine>,
    /// Option lines with wrapped description lines already joined.
    pub options: Vec<SectionLine>,
    pub has_usage_header: bool,
    pub has_options_header: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Usage,
    Options,
}

fn strip_header<'a>(line: &'a str, header: &str) -> Option<&'a str> {
    let trimmed = line.trim_start();
    trimmed
        .get(..header.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(header))
        .map(|_| &trimmed[header.len()..])
}

/// Splits normalized help text into its usage and options sections.
///
/// # Errors
///
/// - [`GrammarError::InlineUsagePattern`] when a pattern follows `Usage:` on
///   the header line
/// - [`GrammarError::NotAnOptionLine`] when an options section starts with a
///   line that is neither an option nor a continuation
///
/// # Examples
///
/// ```
/// use usage_grammar_compiler::sections::split_sections;
///
/// let help = "Tool.\n\nUsage:\n  tool run\n\nOptions:\n  -v  Verbose.\n      Repeatable.\n";
/// let sections = split_sections(help).unwrap();
/// assert_eq!(sections.usage[0].text, "tool run");
/// assert_eq!(sections.options[0].text, "-v  Verbose.  Repeatable.");
/// ```
pub fn split_sections(normalized: &str) -> Result<HelpSections> {
    let mut sections = HelpSections::default();
    let mut state = State::Start;

    for (index, line) in normalized.lines().enumerate() {
        if let Some(rest) = strip_header(line, USAGE_HEADER) {
            if !rest.trim().is_empty() {
                return Err(GrammarError::InlineUsagePattern(line.trim().to_string()));
            }
            debug!(line = index, "entering usage section");
            sections.has_usage_header = true;
            state = State::Usage;
            continue;
        }
        if let Some(rest) = strip_header(line, OPTIONS_HEADER) {
            debug!(line = index, "entering options section");
            sections.has_options_header = true;
            state = State::Options;
            let rest = rest.trim();
            if rest.starts_with('-') {
                sections.options.push(SectionLine {
                    index,
                    text: rest.to_string(),
                });
            } else if !rest.is_empty() {
                warn!(line = index, text = rest, "ignoring text after options header");
            }
            continue;
        }

        let text = line.trim();
        if text.is_empty() {
            if state != State::Start {
                debug!(line = index, "section closed by blank line");
            }
            state = State::Start;
            continue;
        }

        match state {
            State::Start => {}
            State::Usage => sections.usage.push(SectionLine {
                index,
                text: text.to_string(),
            }),
            State::Options if text.starts_with('-') => sections.options.push(SectionLine {
                index,
                text: text.to_string(),
            }),
            State::Options => match sections.options.last_mut() {
                Some(previous) => {
                    previous.text.push_str("  ");
                    previous.text.push_str(text);
                }
                None => {
                    return Err(GrammarError::NotAnOptionLine {
                        line: text.to_string(),
                    });
                }
            },
        }
    }

    Ok(sections)
}
