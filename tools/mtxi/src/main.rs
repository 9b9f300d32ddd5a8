//! mtx Interactive (mtxi) - matrix shell
//!
//! An interactive environment for the mtx matrix extension, running on the
//! reference runtime.
//!
//! # Commands
//!
//! - `:help` - Show help
//! - `:quit` - Exit the shell
//! - `:gc` - Run a full collection and report what was freed
//! - `:vars` - List global bindings

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use mtx_host::Host;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Config, Editor, Helper};

mod config;
mod parse;
mod shell;

use config::ShellConfig;
use shell::Shell;

const COMMANDS: &[&str] = &[":gc", ":help", ":quit", ":vars"];

/// mtx Interactive
#[derive(Parser, Debug)]
#[command(name = "mtxi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files to run on startup, one statement per line
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Evaluate a line and exit
    #[arg(short, long, value_name = "LINE")]
    eval: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Rustyline helper that completes commands, functions and globals.
struct ShellHelper {
    names: Vec<String>,
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        if prefix.starts_with(':') {
            let completions = COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(prefix))
                .map(|cmd| Pair {
                    display: cmd.to_string(),
                    replacement: cmd.to_string(),
                })
                .collect();
            return Ok((0, completions));
        }

        let word_start = prefix
            .rfind(|c: char| !(c.is_alphanumeric() || c == '_'))
            .map_or(0, |i| i + 1);
        let word = &prefix[word_start..];
        if word.is_empty() {
            return Ok((pos, Vec::new()));
        }
        let completions = self
            .names
            .iter()
            .filter(|name| name.starts_with(word))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((word_start, completions))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Owned(format!("\x1b[1;32m{}\x1b[0m", prompt)) // Bold green
    }
}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .init();
    }

    let config = match &cli.config {
        Some(path) => ShellConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ShellConfig::default(),
    };
    let mut shell = Shell::new(config)?;

    for file in &cli.files {
        run_file(&mut shell, file)?;
    }

    if let Some(line) = &cli.eval {
        run_and_print(&mut shell, line);
        return Ok(());
    }
    if !cli.files.is_empty() {
        return Ok(());
    }

    print_banner();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .build();
    let mut rl = Editor::with_config(config)?;

    let mut line_num = 1;
    loop {
        rl.set_helper(Some(ShellHelper {
            names: completion_names(&shell),
        }));
        let prompt = format!("mtxi:{:03}> ", line_num);

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                if line.starts_with(':') {
                    match handle_command(&mut shell, line) {
                        CommandResult::Continue => {}
                        CommandResult::Quit => break,
                    }
                } else {
                    run_and_print(&mut shell, line);
                }

                line_num += 1;
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

fn print_banner() {
    println!("mtx Interactive (mtxi)");
    println!("Version {}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for help, :quit to exit");
    println!();
}

/// Runs a file line by line, stopping at the first error.
fn run_file(shell: &mut Shell, path: &Path) -> Result<()> {
    let source =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    for (index, line) in source.lines().enumerate() {
        let output = shell
            .run_line(line)
            .with_context(|| format!("{}:{}", path.display(), index + 1))?;
        if let Some(text) = output {
            println!("{text}");
        }
    }
    Ok(())
}

fn run_and_print(shell: &mut Shell, line: &str) {
    match shell.run_line(line) {
        Ok(Some(text)) => println!("{text}"),
        Ok(None) => {}
        Err(e) => eprintln!("Error: {e}"),
    }
}

fn completion_names(shell: &Shell) -> Vec<String> {
    let runtime = shell.runtime();
    let mut names: Vec<String> = runtime.natives().into_iter().map(String::from).collect();
    names.extend(runtime.globals().into_iter().map(|(name, _)| name.to_string()));
    names.extend(mtx_matrix::member_names().into_iter().map(String::from));
    names.sort_unstable();
    names.dedup();
    names
}

/// One `name = value` line per global, sorted by name.
fn global_bindings(shell: &Shell) -> Vec<String> {
    let runtime = shell.runtime();
    runtime
        .globals()
        .into_iter()
        .map(|(name, value)| format!("{name} = {}", runtime.print_string(value)))
        .collect()
}

enum CommandResult {
    Continue,
    Quit,
}

fn handle_command(shell: &mut Shell, cmd: &str) -> CommandResult {
    let cmd_name = cmd.split_whitespace().next().unwrap_or("");

    match cmd_name {
        ":quit" | ":q" => CommandResult::Quit,

        ":help" | ":h" | ":?" => {
            print_help();
            CommandResult::Continue
        }

        ":gc" => {
            let stats = shell.collect();
            println!("{stats}");
            CommandResult::Continue
        }

        ":vars" | ":v" => {
            for line in global_bindings(shell) {
                println!("{line}");
            }
            CommandResult::Continue
        }

        _ => {
            println!("Unknown command: {}", cmd_name);
            println!("Type :help for help");
            CommandResult::Continue
        }
    }
}

fn print_help() {
    println!(
        r#"Commands:
  :help, :h, :?         Show this help
  :quit, :q             Exit the shell
  :gc                   Run a full collection
  :vars, :v             List global bindings

Statements:
  name = expr           Bind a global
  expr                  Evaluate and print

Expressions:
  mat(r, c)  ident(n)  vec(x, ...)  vect(x, ...)  concatRow(m, ...)  concatCol(m, ...)
  m.rows  m.cols  m.size  m.get(r, c)  m.set(r, c, x)  m.printStr()
  a + b  a - b  a * b  -a  (expr)  1  2.5  "text"  nil

Keybindings:
  Ctrl-C                Cancel current input
  Ctrl-D                Exit (at empty prompt)
  Tab                   Autocomplete
  Up/Down               Navigate history
"#
    );
}
