//! Thorn CLI
//!
//! `thorn` either runs a source file to completion or drops into an
//! interactive REPL. Both paths share one interpreter core
//! (`thorn-eval`); this binary is just argument parsing, source
//! loading, and result rendering around it.

mod repl;

use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use colored::Colorize;
use thorn_eval::Interpreter;

#[derive(Parser)]
#[command(name = "thorn")]
#[command(author = "Thorn Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Thorn - a small tree-walking interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Source file to run (shorthand for `thorn run FILE`)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a source file
    Run {
        /// Input source file
        input: PathBuf,
    },

    /// Start the interactive REPL
    Repl,

    /// Show version information
    Version,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = std::env::var("THORN_LOG").unwrap_or_else(|_| default_filter.to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Run { input }) => cmd_run(&input),
        Some(Commands::Repl) => repl::run(),
        Some(Commands::Version) => {
            println!("{} {}", "thorn".bold(), env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => match cli.input {
            Some(input) => cmd_run(&input),
            None => repl::run(),
        },
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        exit(1);
    }
}

/// Run a source file to completion, then collect once before exit — a
/// safe point with no live call frames left to reach anything.
fn cmd_run(input: &PathBuf) -> Result<(), String> {
    let source = std::fs::read_to_string(input)
        .map_err(|e| format!("cannot read '{}': {}", input.display(), e))?;

    let (program, errors) = thorn_parser::parse(&source);
    if !errors.is_empty() {
        for message in &errors {
            eprintln!("{} {}", "parse error:".red().bold(), message);
        }
        return Err(format!("{} parse error(s)", errors.len()));
    }

    let interpreter = Interpreter::new();
    let result = interpreter
        .evaluator()
        .eval_program(&program, interpreter.root());

    if thorn_eval::value::is_error(&result) {
        interpreter.collect();
        return Err(result.to_string());
    }

    tracing::debug!(result = %result, "program finished");
    interpreter.collect();
    Ok(())
}
