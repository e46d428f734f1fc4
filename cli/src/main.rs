mod config;
mod output;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;
use usage_grammar_compiler::compile_help_with_config;
use usage_grammar_core::Grammar;
use usage_grammar_matcher::{MatchError, match_argv_with_config};

use config::CliConfig;
use output::{OutputFormat, format_grammar, format_matches, usage_section};

#[derive(Debug, Parser)]
#[command(name = "usage-match", version)]
#[command(about = "Compile docopt-style usage text and match arguments against it")]
struct Cli {
    /// Log compilation and matching steps to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    /// YAML file with `compile` and `matching` settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Match arguments against the usage lines of a help text.
    Match(MatchArgs),
    /// Compile a help text and print its canonical form.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct MatchArgs {
    /// Help text file, or `-` for stdin.
    #[arg(long)]
    help_file: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Arguments to match, starting with the program name (after `--`).
    #[arg(last = true, required = true)]
    argv: Vec<String>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Help text file, or `-` for stdin.
    #[arg(long)]
    help_file: PathBuf,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
}

/// Exit status when argv fits no usage line.
const EXIT_NO_MATCH: i32 = 2;
/// Exit status for every other failure.
const EXIT_FAILURE: i32 = 1;

/// A failed run; rejected argv exits with its own status.
#[derive(Debug)]
enum Failure {
    NoMatch(String),
    Error(String),
}

impl Failure {
    fn exit_code(&self) -> i32 {
        match self {
            Self::NoMatch(_) => EXIT_NO_MATCH,
            Self::Error(_) => EXIT_FAILURE,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::NoMatch(message) | Self::Error(message) => message,
        }
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::Error(message)
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = CliConfig::load(cli.config.as_deref())
        .map_err(Failure::Error)
        .and_then(|config| match cli.command {
            Command::Match(args) => run_match(args, &config),
            Command::Check(args) => run_check(args, &config).map_err(Failure::Error),
        });

    if let Err(failure) = result {
        eprintln!("error: {}", failure.message());
        std::process::exit(failure.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn read_help_text(path: &Path) -> Result<String, String> {
    if path == Path::new("-") {
        let mut help_text = String::new();
        std::io::stdin()
            .read_to_string(&mut help_text)
            .map_err(|err| format!("Failed to read stdin: {err}"))?;
        return Ok(help_text);
    }
    fs::read_to_string(path).map_err(|err| format!("Failed to read '{}': {err}", path.display()))
}

fn compile(path: &Path, config: &CliConfig) -> Result<Grammar, String> {
    let help_text = read_help_text(path)?;
    let grammar = compile_help_with_config(&help_text, &config.compile)
        .map_err(|err| format!("Failed to compile '{}': {err}", path.display()))?;
    debug!(
        usages = grammar.usages().len(),
        options = grammar.options().len(),
        "help text compiled"
    );
    Ok(grammar)
}

fn run_match(args: MatchArgs, config: &CliConfig) -> Result<(), Failure> {
    let grammar = compile(&args.help_file, config)?;
    match match_argv_with_config(&grammar, &args.argv, &config.matching) {
        Ok(matches) => {
            print!("{}", ensure_newline(format_matches(&matches, args.format)?));
            Ok(())
        }
        Err(err @ MatchError::NoMatch) => {
            eprint!("{}", usage_section(&grammar));
            Err(Failure::NoMatch(err.to_string()))
        }
        Err(err) => Err(Failure::Error(err.to_string())),
    }
}

fn run_check(args: CheckArgs, config: &CliConfig) -> Result<(), String> {
    let grammar = compile(&args.help_file, config)?;
    print!("{}", ensure_newline(format_grammar(&grammar, args.format)?));
    Ok(())
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
