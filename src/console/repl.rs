//! Interactive prompt.
//!
//! Lines starting with `\` are console commands; everything else is sent to
//! the gateway as SQL, untouched.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use super::client::QueryBackend;
use super::render::{render, View};
use super::state::{Console, SubmitOutcome, CONNECT_ERROR};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Sql(String),
    Tables,
    Use(String),
    /// Zero-based canned action of the selected table.
    Canned(usize),
    Refresh,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    let Some(meta) = trimmed.strip_prefix('\\') else {
        return Command::Sql(line.to_string());
    };

    let (name, arg) = match meta.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (meta, ""),
    };

    match name {
        "tables" | "t" => Command::Tables,
        "use" | "u" if !arg.is_empty() => Command::Use(arg.to_string()),
        "refresh" | "r" => Command::Refresh,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        n => match n.parse::<usize>() {
            Ok(index) if index >= 1 => Command::Canned(index - 1),
            _ => Command::Unknown(trimmed.to_string()),
        },
    }
}

pub const HELP: &str = "\
Commands:
  \\tables          list tables
  \\use <table>     select a table and show its canned queries
  \\1 \\2 \\3         run a canned query of the selected table
  \\refresh         reload the table list
  \\help            show this help
  \\quit            exit
Anything else is sent to the database as SQL.";

/// Result of handling one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome {
    pub output: String,
    pub quit: bool,
}

impl LineOutcome {
    fn show(output: impl Into<String>) -> Self {
        Self { output: output.into(), quit: false }
    }
}

pub fn render_tables<B: QueryBackend>(console: &Console<B>) -> String {
    let state = console.state();
    if state.tables().is_empty() {
        return "No tables.".to_string();
    }

    state
        .tables()
        .iter()
        .map(|t| {
            let marker = if Some(t.as_str()) == state.selected_table() { "*" } else { " " };
            format!("{} {}", marker, t)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_actions<B: QueryBackend>(console: &Console<B>) -> String {
    console
        .state()
        .canned_actions()
        .iter()
        .enumerate()
        .map(|(i, (canned, sql))| format!("\\{}  {:<20} {}", i + 1, canned.label(), sql))
        .collect::<Vec<_>>()
        .join("\n")
}

fn submission_output<B: QueryBackend>(console: &Console<B>, outcome: SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Ignored => String::new(),
        SubmitOutcome::Busy => "A query is already running.".to_string(),
        SubmitOutcome::Started(_) => render(&console.state().view()),
    }
}

pub async fn handle_line<B: QueryBackend>(console: &mut Console<B>, line: &str) -> LineOutcome {
    let command = parse_command(line);
    debug!("Console command: {:?}", command);

    match command {
        Command::Empty => LineOutcome::show(""),
        Command::Sql(sql) => {
            console.state_mut().set_query(sql);
            let outcome = console.submit().await;
            LineOutcome::show(submission_output(console, outcome))
        }
        Command::Tables => LineOutcome::show(render_tables(console)),
        Command::Use(table) => {
            if console.state_mut().select_table(&table) {
                LineOutcome::show(render_actions(console))
            } else {
                LineOutcome::show(format!("Unknown table '{}'. Use \\tables to list tables.", table))
            }
        }
        Command::Canned(index) => match console.run_canned(index).await {
            Some(outcome) => LineOutcome::show(submission_output(console, outcome)),
            None if console.state().selected_table().is_none() => {
                LineOutcome::show("No table selected. Use \\use <table> first.")
            }
            None => LineOutcome::show(format!("No canned query \\{}.", index + 1)),
        },
        Command::Refresh => {
            if console.load_tables().await {
                LineOutcome::show(render_tables(console))
            } else {
                LineOutcome::show(render(&View::Error(CONNECT_ERROR)))
            }
        }
        Command::Help => LineOutcome::show(HELP),
        Command::Quit => LineOutcome { output: String::new(), quit: true },
        Command::Unknown(text) => LineOutcome::show(format!("Unknown command '{}'. Try \\help.", text)),
    }
}

fn prompt<B: QueryBackend>(console: &Console<B>) -> String {
    match console.state().selected_table() {
        Some(table) => format!("explorer[{}]> ", table),
        None => "explorer> ".to_string(),
    }
}

/// Runs the prompt until `\quit` or end of input.
pub async fn run_interactive<B: QueryBackend>(console: &mut Console<B>) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;

    if let Some(error) = console.state().error() {
        println!("{}", render(&View::Error(error)));
    }
    println!("{} tables available. Type \\help for commands.", console.state().tables().len());

    loop {
        match editor.readline(&prompt(console)) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }

                let outcome = handle_line(console, &line).await;
                if !outcome.output.is_empty() {
                    println!("{}", outcome.output);
                }
                if outcome.quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
