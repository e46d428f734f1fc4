//! Word scanners for usage lines and option lines.
//!
//! Both scanners are explicit cursors over a borrowed line: each call returns
//! the next word and advances the cursor past it. Nothing is shared between
//! scanners, so any number of lines can be scanned independently.

const ELLIPSIS: &str = "...";

/// Bracket flavor of a group delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    /// `[ ... ]`, an optional group.
    Square,
    /// `( ... )`, a required group.
    Paren,
}

impl Bracket {
    pub const fn open(self) -> char {
        match self {
            Self::Square => '[',
            Self::Paren => '(',
        }
    }

    pub const fn close(self) -> char {
        match self {
            Self::Square => ']',
            Self::Paren => ')',
        }
    }
}

/// An atomic word of a usage line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Word<'a> {
    Open(Bracket),
    Close(Bracket),
    /// `|`
    Bar,
    /// `...`
    Ellipsis,
    /// Any other run of non-space, non-delimiter characters.
    Text(&'a str),
}

fn is_delimiter(ch: char) -> bool {
    matches!(ch, '[' | ']' | '(' | ')' | '|')
}

/// Cursor over one usage line.
///
/// # Examples
///
/// ```
/// use usage_grammar_compiler::scanner::{Bracket, Scanner, Word};
///
/// let words: Vec<Word> = Scanner::new("prog [<file>...]|-v").collect();
/// assert_eq!(
///     words,
///     vec![
///         Word::Text("prog"),
///         Word::Open(Bracket::Square),
///         Word::Text("<file>"),
///         Word::Ellipsis,
///         Word::Close(Bracket::Square),
///         Word::Bar,
///         Word::Text("-v"),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Unscanned remainder of the line.
    pub fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    /// Skips whitespace and returns the next word, or `None` at end of line.
    pub fn next_word(&mut self) -> Option<Word<'a>> {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();

        let first = trimmed.chars().next()?;
        let word = match first {
            '[' => Word::Open(Bracket::Square),
            ']' => Word::Close(Bracket::Square),
            '(' => Word::Open(Bracket::Paren),
            ')' => Word::Close(Bracket::Paren),
            '|' => Word::Bar,
            _ if trimmed.starts_with(ELLIPSIS) => {
                self.pos += ELLIPSIS.len();
                return Some(Word::Ellipsis);
            }
            _ => {
                let end = trimmed
                    .char_indices()
                    .find(|&(idx, ch)| {
                        ch.is_whitespace() || is_delimiter(ch) || trimmed[idx..].starts_with(ELLIPSIS)
                    })
                    .map_or(trimmed.len(), |(idx, _)| idx);
                self.pos += end;
                return Some(Word::Text(&trimmed[..end]));
            }
        };
        self.pos += first.len_utf8();
        Some(word)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Word<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_word()
    }
}

/// Cursor over the flag spec of one option line.
///
/// Sub-words are separated by commas, `=` or whitespace. Scanning stops at
/// the first gap of two spaces (or a tab), which separates the flag spec from
/// its description.
///
/// # Examples
///
/// ```
/// use usage_grammar_compiler::scanner::OptionScanner;
///
/// let mut scanner = OptionScanner::new("-i <file>, --input <file>  Input file.");
/// let words: Vec<&str> = std::iter::from_fn(|| scanner.next_subword()).collect();
/// assert_eq!(words, vec!["-i", "<file>", "--input", "<file>"]);
/// assert_eq!(scanner.description(), "Input file.");
/// ```
#[derive(Debug, Clone)]
pub struct OptionScanner<'a> {
    line: &'a str,
    pos: usize,
}

fn is_option_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == ',' || ch == '='
}

impl<'a> OptionScanner<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    fn at_description_gap(&self) -> bool {
        let rest = self.rest();
        rest.starts_with("  ") || rest.starts_with('\t')
    }

    /// Returns the next flag-spec sub-word, or `None` at the description gap
    /// or end of line.
    pub fn next_subword(&mut self) -> Option<&'a str> {
        if self.at_description_gap() {
            return None;
        }
        let rest = self.rest();
        let start = rest.find(|ch: char| !is_option_separator(ch))?;
        let word = &rest[start..];
        let len = word.find(is_option_separator).unwrap_or(word.len());
        self.pos += start + len;
        Some(&word[..len])
    }

    /// Text after the flag spec, trimmed. Only meaningful once
    /// [`next_subword`](Self::next_subword) has returned `None`.
    pub fn description(&self) -> &'a str {
        self.rest().trim()
    }
}
