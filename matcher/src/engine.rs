//! Backtracking search over a usage pattern tree.
//!
//! Every node is matched with an explicit continuation: the rest of the
//! pattern that must still match after it. A node succeeds only if its
//! continuation succeeds, so optional and alternative groups can try their
//! choices in order and undo a choice when the remainder dead-ends.
//! Bindings live on one stack that is truncated back to a mark on every
//! failed branch.
//!
//! Repeat groups run their repetitions in a loop rather than through the
//! continuation, so stack depth follows pattern nesting and not argv length.

use usage_grammar_core::{Binding, Group, OptionEntry, OptionRef, OptionTable, Pattern, Root};

use crate::error::{MatchError, Result};

/// Pending work after the current node.
#[derive(Debug, Clone, Copy)]
enum Frame<'g> {
    /// Remaining siblings of a sequence.
    Sequence(&'g [Pattern]),
    /// End of a standalone repetition; succeeds wherever it is reached.
    Accept,
}

/// A linked stack of frames borrowed from the enclosing calls.
struct Cont<'g, 'c> {
    frame: Frame<'g>,
    next: Option<&'c Cont<'g, 'c>>,
}

/// Matching state for one argv, reused across usage lines.
pub(crate) struct Engine<'g, 't> {
    options: &'g OptionTable,
    tokens: &'t [&'t str],
    bindings: Vec<Binding>,
    steps: usize,
    budget: Option<usize>,
    /// Position where the last [`Frame::Accept`] was reached.
    accepted_at: usize,
}

impl<'g, 't> Engine<'g, 't> {
    /// `tokens` are the arguments after the program name.
    pub(crate) fn new(options: &'g OptionTable, tokens: &'t [&'t str], budget: Option<usize>) -> Self {
        Self {
            options,
            tokens,
            bindings: Vec::new(),
            steps: 0,
            budget,
            accepted_at: 0,
        }
    }

    /// Matches all tokens against one usage line. The step count carries
    /// over between lines so the budget covers the whole call.
    pub(crate) fn match_root(&mut self, program: &str, root: &'g Root) -> Result<Option<Vec<Binding>>> {
        self.bindings.clear();
        self.bindings.push(Binding::program_name(program));
        if self.match_seq(root.children(), 0, None)? {
            Ok(Some(std::mem::take(&mut self.bindings)))
        } else {
            Ok(None)
        }
    }

    pub(crate) fn steps(&self) -> usize {
        self.steps
    }

    fn tick(&mut self) -> Result<()> {
        self.steps += 1;
        match self.budget {
            Some(budget) if self.steps > budget => Err(MatchError::BudgetExhausted { budget }),
            _ => Ok(()),
        }
    }

    fn match_seq<'c>(
        &mut self,
        seq: &'g [Pattern],
        pos: usize,
        next: Option<&'c Cont<'g, 'c>>,
    ) -> Result<bool> {
        match seq.split_first() {
            None => self.resume(pos, next),
            Some((first, rest)) => {
                let cont = Cont {
                    frame: Frame::Sequence(rest),
                    next,
                };
                self.match_node(first, pos, Some(&cont))
            }
        }
    }

    fn resume<'c>(&mut self, pos: usize, next: Option<&'c Cont<'g, 'c>>) -> Result<bool> {
        let Some(cont) = next else {
            return Ok(pos == self.tokens.len());
        };
        match cont.frame {
            Frame::Sequence(seq) => self.match_seq(seq, pos, cont.next),
            Frame::Accept => {
                self.accepted_at = pos;
                Ok(true)
            }
        }
    }

    fn match_node<'c>(
        &mut self,
        node: &'g Pattern,
        pos: usize,
        next: Option<&'c Cont<'g, 'c>>,
    ) -> Result<bool> {
        self.tick()?;
        if let Pattern::Group(group) = node {
            return self.match_group(group, pos, next);
        }

        let Some((consumed, binding)) = self.match_leaf(node, pos) else {
            return Ok(false);
        };
        let mark = self.bindings.len();
        self.bindings.push(binding);
        if self.resume(pos + consumed, next)? {
            return Ok(true);
        }
        self.bindings.truncate(mark);
        Ok(false)
    }

    fn match_group<'c>(
        &mut self,
        group: &'g Group,
        pos: usize,
        next: Option<&'c Cont<'g, 'c>>,
    ) -> Result<bool> {
        if !group.optional {
            return self.match_required(group, pos, next);
        }
        let mark = self.bindings.len();
        if self.match_required(group, pos, next)? {
            return Ok(true);
        }
        self.bindings.truncate(mark);
        self.resume(pos, next)
    }

    fn match_required<'c>(
        &mut self,
        group: &'g Group,
        pos: usize,
        next: Option<&'c Cont<'g, 'c>>,
    ) -> Result<bool> {
        if let Some(element) = group.repeated() {
            return self.match_repeat(element, pos, next);
        }

        if group.alternative {
            for choice in group.children() {
                let mark = self.bindings.len();
                if self.match_node(choice, pos, next)? {
                    return Ok(true);
                }
                self.bindings.truncate(mark);
            }
            return Ok(false);
        }

        self.match_seq(group.children(), pos, next)
    }

    /// Runs repetitions greedily, each kept at its first standalone match,
    /// then tries the continuation after the longest run and after shorter
    /// ones down to a single repetition. The last repetition of each attempt
    /// is matched against the continuation, so it may still backtrack inside.
    fn match_repeat<'c>(
        &mut self,
        element: &'g Pattern,
        pos: usize,
        next: Option<&'c Cont<'g, 'c>>,
    ) -> Result<bool> {
        // (start position, binding mark) of each repetition.
        let mut starts = vec![(pos, self.bindings.len())];
        let mut at = pos;
        loop {
            let mark = self.bindings.len();
            match self.match_once(element, at)? {
                Some(end) if end > at => {
                    starts.push((end, self.bindings.len()));
                    at = end;
                }
                // A repetition that consumed nothing ends the loop.
                Some(_) => {
                    self.bindings.truncate(mark);
                    break;
                }
                None => break,
            }
        }

        for &(start, mark) in starts.iter().rev() {
            self.bindings.truncate(mark);
            if self.match_node(element, start, next)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Matches `node` on its own and returns where its first match ends.
    fn match_once(&mut self, node: &'g Pattern, pos: usize) -> Result<Option<usize>> {
        let accept = Cont {
            frame: Frame::Accept,
            next: None,
        };
        if self.match_node(node, pos, Some(&accept))? {
            Ok(Some(self.accepted_at))
        } else {
            Ok(None)
        }
    }

    /// Returns the token count a leaf consumes at `pos` and its binding.
    fn match_leaf(&self, leaf: &Pattern, pos: usize) -> Option<(usize, Binding)> {
        let token = *self.tokens.get(pos)?;
        match leaf {
            Pattern::Command(name) => (token == name).then(|| (1, Binding::subcommand(name))),
            Pattern::Argument(name) => Some((1, Binding::argument(name, token))),
            Pattern::Option(option) => self.match_option(option, pos, token),
            Pattern::Group(_) => None,
        }
    }

    fn match_option(&self, option: &OptionRef, pos: usize, token: &str) -> Option<(usize, Binding)> {
        let entry = self.options.get(&option.key)?;
        if !entry.takes_value() {
            return entry
                .matches(token)
                .then(|| (1, Binding::option(&option.key, token)));
        }
        if entry.matches(token) {
            let value = self.tokens.get(pos + 1)?;
            return Some((2, Binding::option(&option.key, value)));
        }
        attached_value(entry, token).map(|value| (1, Binding::option(&option.key, value)))
    }
}

/// Splits `--name=VALUE` or `-oVALUE` against the entry's synonyms.
fn attached_value<'t>(entry: &OptionEntry, token: &'t str) -> Option<&'t str> {
    entry.synonyms.iter().find_map(|key| {
        let rest = token.strip_prefix(key.as_str())?;
        if key.starts_with("--") {
            rest.strip_prefix('=')
        } else {
            Some(rest).filter(|value| !value.is_empty())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use usage_grammar_compiler::compile_help;
    use usage_grammar_core::{BindingKind, Grammar};

    fn grammar(help: &str) -> Grammar {
        compile_help(help).unwrap()
    }

    fn run(grammar: &Grammar, tokens: &[&str]) -> Option<Vec<Binding>> {
        let mut engine = Engine::new(grammar.options(), tokens, None);
        engine.match_root("prog", &grammar.usages()[0]).unwrap()
    }

    #[test]
    fn test_optional_backtracks_when_greedy_choice_dead_ends() {
        let grammar = grammar("Usage:\n  prog [<a>] <b>\n");
        let bindings = run(&grammar, &["only"]).unwrap();
        assert_eq!(bindings[1], Binding::argument("<b>", "only"));
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn test_repeat_gives_back_tokens_to_the_rest() {
        let grammar = grammar("Usage:\n  prog <src>... <dst>\n");
        let bindings = run(&grammar, &["a", "b", "c"]).unwrap();
        let kinds: Vec<(&str, &str)> = bindings[1..]
            .iter()
            .map(|b| (b.key.as_deref().unwrap(), b.value.as_str()))
            .collect();
        assert_eq!(kinds, vec![("<src>", "a"), ("<src>", "b"), ("<dst>", "c")]);
    }

    #[test]
    fn test_repeat_of_optional_terminates() {
        let grammar = grammar("Usage:\n  prog [<x>]... end\n");
        assert!(run(&grammar, &["end"]).is_some());
        assert!(run(&grammar, &["a", "b", "end"]).is_some());
        assert!(run(&grammar, &["a", "b"]).is_none());
    }

    #[test]
    fn test_last_repetition_backtracks_inside_element() {
        let grammar = grammar("Usage:\n  prog (<a> [<b>])... <c>\n");
        let bindings = run(&grammar, &["x", "y"]).unwrap();
        assert_eq!(bindings[1], Binding::argument("<a>", "x"));
        assert_eq!(bindings[2], Binding::argument("<c>", "y"));

        let bindings = run(&grammar, &["w", "x", "y", "z"]).unwrap();
        let keys: Vec<&str> = bindings[1..]
            .iter()
            .map(|b| b.key.as_deref().unwrap())
            .collect();
        assert_eq!(keys, vec!["<a>", "<b>", "<a>", "<c>"]);
    }

    #[test]
    fn test_repeat_keeps_every_binding_of_a_long_run() {
        let grammar = grammar("Usage:\n  prog (<k> <v>)...\n");
        let owned: Vec<String> = (0..20_000).map(|i| format!("t{i}")).collect();
        let tokens: Vec<&str> = owned.iter().map(String::as_str).collect();
        let bindings = run(&grammar, &tokens).unwrap();
        assert_eq!(bindings.len(), 20_001);
        assert_eq!(bindings[20_000], Binding::argument("<v>", "t19999"));
        assert!(run(&grammar, &tokens[1..]).is_none());
    }

    #[test]
    fn test_alternative_tries_choices_in_order() {
        let grammar = grammar("Usage:\n  prog (<x> | go) go\n");
        let bindings = run(&grammar, &["go", "go"]).unwrap();
        assert_eq!(bindings[1].kind, BindingKind::Argument);
    }

    #[test]
    fn test_option_value_forms() {
        let help = "Usage:\n  prog [--speed=<kn>]\n\nOptions:\n  -s --speed=<kn>  Speed.\n";
        let grammar = grammar(help);
        for tokens in [&["--speed", "10"][..], &["--speed=10"], &["-s", "10"], &["-s10"]] {
            let bindings = run(&grammar, tokens).unwrap();
            assert_eq!(bindings[1], Binding::option("--speed", "10"), "{tokens:?}");
        }
        assert!(run(&grammar, &["--speed"]).is_none());
        assert!(run(&grammar, &["--speedy"]).is_none());
    }

    #[test]
    fn test_boolean_flag_binds_the_token_itself() {
        let help = "Usage:\n  prog --verbose\n\nOptions:\n  -v --verbose  Loud.\n";
        let grammar = grammar(help);
        let bindings = run(&grammar, &["-v"]).unwrap();
        assert_eq!(bindings[1], Binding::option("--verbose", "-v"));
        assert!(run(&grammar, &["-vv"]).is_none());
    }

    #[test]
    fn test_leftover_tokens_fail() {
        let grammar = grammar("Usage:\n  prog run\n");
        assert!(run(&grammar, &["run", "extra"]).is_none());
        assert!(run(&grammar, &[]).is_none());
    }

    #[test]
    fn test_budget_stops_search() {
        let grammar = grammar("Usage:\n  prog [<a>]... [<b>]... end\n");
        let tokens = ["x"; 12];
        let mut engine = Engine::new(grammar.options(), &tokens, Some(50));
        assert_eq!(
            engine.match_root("prog", &grammar.usages()[0]),
            Err(MatchError::BudgetExhausted { budget: 50 })
        );
        assert_eq!(engine.steps(), 51);
    }
}
