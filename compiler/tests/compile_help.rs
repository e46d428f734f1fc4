use std::fs;
use std::path::PathBuf;

use usage_grammar_compiler::{compile_help, compile_usage};
use usage_grammar_core::{GrammarError, Pattern};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("fixture file must be readable")
}

// ---------------------------------------------------------------------------
// Full help texts
// ---------------------------------------------------------------------------

#[test]
fn test_naval_fate_compiles_every_usage_line() {
    let grammar = compile_help(&fixture("naval_fate.txt")).expect("fixture should compile");

    let rendered: Vec<String> = grammar.usages().iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "naval_fate ship new <name>...",
            "naval_fate ship <name> move <x> <y> [--speed=<kn>]",
            "naval_fate ship shoot <x> <y>",
            "naval_fate mine (set | remove) <x> <y> [--moored | --drifting]",
            "naval_fate (-h | --help)",
            "naval_fate --version",
        ]
    );
    assert_eq!(grammar.program_names(), vec!["naval_fate"]);
}

#[test]
fn test_naval_fate_option_table() {
    let grammar = compile_help(&fixture("naval_fate.txt")).expect("fixture should compile");
    let options = grammar.options();

    assert_eq!(options.len(), 5);
    let help = options.get("-h").expect("-h declared");
    assert!(help.matches("--help"));
    assert!(!help.takes_value());

    let speed = options.get("--speed").expect("--speed declared");
    assert_eq!(speed.value.as_deref(), Some("<kn>"));
    assert_eq!(speed.default.as_deref(), Some("10"));
}

#[test]
fn test_wrapped_option_descriptions_keep_defaults() {
    let grammar = compile_help(&fixture("wrapped_options.txt")).expect("fixture should compile");

    let output = grammar.options().get("--output").expect("--output declared");
    assert_eq!(output.synonyms, vec!["-o", "--output"]);
    assert_eq!(output.value.as_deref(), Some("FILE"));
    assert_eq!(
        output.description.as_deref(),
        Some("Write the report to FILE instead of  standard output.")
    );

    let coefficient = grammar.options().get("--coefficient").expect("declared");
    assert_eq!(coefficient.default.as_deref(), Some("2.95"));
}

#[test]
fn test_crlf_help_text_compiles() {
    let grammar = compile_help(&fixture("crlf.txt")).expect("CRLF text should compile");
    assert_eq!(grammar.usages()[0].to_string(), "prog run [-q]");
    assert!(grammar.options().contains("--quiet"));
}

#[test]
fn test_grammar_display_round_trips() {
    let grammar = compile_help(&fixture("naval_fate.txt")).expect("fixture should compile");
    let again = compile_help(&grammar.to_string()).expect("rendered grammar should compile");
    assert_eq!(again.usages(), grammar.usages());
    assert_eq!(again.options().len(), grammar.options().len());
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn test_unresolved_usage_option() {
    let help = "Usage:\n  prog [--force]\n\nOptions:\n  --dry-run  Only print.\n";
    assert_eq!(
        compile_help(help).unwrap_err(),
        GrammarError::UnresolvedOption {
            key: "--force".to_string()
        }
    );
}

#[test]
fn test_inline_value_on_declared_boolean_flag() {
    let help = "Usage:\n  prog --force=<x>\n\nOptions:\n  --force  Force.\n";
    assert!(matches!(
        compile_help(help).unwrap_err(),
        GrammarError::UnexpectedOptionValue { .. }
    ));
}

#[test]
fn test_bad_usage_line_reports_line_text() {
    let help = "Usage:\n  prog ok\n  prog (broken\n";
    assert_eq!(
        compile_help(help).unwrap_err(),
        GrammarError::UnclosedGroup {
            open: '(',
            line: "prog (broken".to_string()
        }
    );
}

#[test]
fn test_usage_on_header_line_is_rejected() {
    assert!(matches!(
        compile_help("Usage: prog run\n").unwrap_err(),
        GrammarError::InlineUsagePattern(_)
    ));
}

// ---------------------------------------------------------------------------
// Single lines
// ---------------------------------------------------------------------------

#[test]
fn test_nested_optional_alternative_inside_repeat() {
    let root = compile_usage("prog [(add | rm) <path>]...").expect("line should compile");
    let Pattern::Group(repeat) = &root.children()[0] else {
        panic!("expected group");
    };
    let Some(Pattern::Group(optional)) = repeat.repeated() else {
        panic!("expected repeated group");
    };
    assert!(optional.optional);
    assert_eq!(root.to_string(), "prog [(add | rm) <path>]...");
}
