//! Interactive REPL for Thorn
//!
//! Read-eval-print loop over a single persistent interpreter: each line
//! is parsed and evaluated in the same root environment, so `let`
//! bindings and function definitions from earlier lines stay visible to
//! later ones.

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::History;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Editor, Helper};

use thorn_eval::Interpreter;

const KEYWORDS: &[&str] = &["let", "fn", "if", "else", "return", "true", "false", "null"];

/// REPL helper: keyword completion plus brace/paren-balance validation
/// so a multiline function literal doesn't submit mid-body.
struct ReplHelper;

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(|c: char| !c.is_alphanumeric() && c != '_')
            .map(|i| i + 1)
            .unwrap_or(0);

        let prefix = &line[start..pos];
        if prefix.is_empty() {
            return Ok((pos, Vec::new()));
        }

        let candidates = KEYWORDS
            .iter()
            .filter(|kw| kw.starts_with(prefix))
            .map(|kw| Pair {
                display: kw.to_string(),
                replacement: kw.to_string(),
            })
            .collect();

        Ok((start, candidates))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;
}

impl Highlighter for ReplHelper {}

impl Validator for ReplHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let input = ctx.input();

        let open_braces = input.chars().filter(|&c| c == '{').count();
        let close_braces = input.chars().filter(|&c| c == '}').count();
        let open_parens = input.chars().filter(|&c| c == '(').count();
        let close_parens = input.chars().filter(|&c| c == ')').count();

        if open_braces > close_braces || open_parens > close_parens {
            return Ok(ValidationResult::Incomplete);
        }

        Ok(ValidationResult::Valid(None))
    }
}

/// Start the interactive REPL.
pub fn run() -> Result<(), String> {
    println!("{}", "Thorn REPL".bold().cyan());
    println!("Type an expression to evaluate, or :help for commands");
    println!();

    let mut rl = Editor::new().map_err(|e| format!("failed to create editor: {e}"))?;
    rl.set_helper(Some(ReplHelper));

    let history_path = std::env::temp_dir().join(".thorn_repl_history");
    let _ = rl.load_history(&history_path);

    let interpreter = Interpreter::new();

    loop {
        let readline = rl.readline("thorn> ");

        match readline {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(input);

                if input.starts_with(':') {
                    if handle_command(input, &rl) {
                        break;
                    }
                    continue;
                }

                handle_expression(input, &interpreter);
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("exit");
                break;
            }
            Err(err) => {
                println!("{} {:?}", "error:".red().bold(), err);
                break;
            }
        }
    }

    let _ = rl.save_history(&history_path);
    Ok(())
}

/// Handle a REPL command; returns true if the loop should exit.
fn handle_command(input: &str, rl: &Editor<ReplHelper, rustyline::history::DefaultHistory>) -> bool {
    match input {
        ":quit" | ":q" | ":exit" => {
            println!("Goodbye!");
            return true;
        }
        ":help" | ":h" => {
            println!("{}", "Commands:".bold());
            println!("  :help, :h     Show this help");
            println!("  :quit, :q     Exit the REPL");
            println!("  :history      Show input history");
            println!();
            println!("{}", "Features:".bold());
            println!("  - Bindings persist across lines: let x = 5; then x + 1");
            println!("  - Multiline input: unclosed braces/parens continue to next line");
            println!("  - Tab completion: press Tab for keyword suggestions");
            println!();
            println!("{}", "Examples:".bold());
            println!("  let add = fn(a, b) {{ a + b }};   Define a closure");
            println!("  add(2, 3);                       Call it");
            println!("  1 + 2 * 3                        Evaluate an expression");
        }
        ":history" => {
            let history = rl.history();
            if history.is_empty() {
                println!("No history");
            } else {
                for (i, item) in history.iter().enumerate() {
                    println!("{:3}  {}", i + 1, item);
                }
            }
        }
        _ => {
            println!("{} unknown command: {}", "error:".red().bold(), input);
        }
    }
    false
}

/// Evaluate one line against the interpreter's persistent root
/// environment, then collect — every call frame from this line has
/// already returned, so it's a safe point to reclaim orphaned cycles.
fn handle_expression(input: &str, interpreter: &Interpreter) {
    let result = interpreter.eval(input);
    if thorn_eval::value::is_error(&result) {
        println!("{} {}", "error:".red().bold(), result);
    } else {
        println!("{} {}", "=>".cyan(), result);
    }
    interpreter.collect();
}
