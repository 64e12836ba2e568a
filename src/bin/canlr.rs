//! Command-line demo for the canlr recognizer.
//!
//! Wraps the library around a hardcoded arithmetic grammar
//! (`E → T + E | T`, `T → F * T | F`, `F → id`) and exposes two commands:
//! `parse`, which runs the driver over a token sequence and prints one line
//! per transition, and `dump`, which prints the productions, the canonical
//! collection, and the action table. Set `RUST_LOG=canlr=trace` to see the
//! library's own trace output as well.

use anyhow::Result;
use canlr::{ActionTable, Grammar, Parser};
use clap::{Parser as ClapParser, Subcommand};
use std::io;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parses a token sequence, e.g. `canlr parse id + id '*' id`
    Parse {
        /// Whitespace-separated terminal tokens
        tokens: Vec<String>,
    },
    /// Prints the grammar, the automaton states, and the action table
    Dump,
}

fn arithmetic_grammar() -> Grammar {
    Grammar::new(&[
        ("E", &["T", "+", "E"][..]),
        ("E", &["T"][..]),
        ("T", &["F", "*", "T"][..]),
        ("T", &["F"][..]),
        ("F", &["id"][..]),
    ])
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let grammar = arithmetic_grammar();
    let table = ActionTable::build(&grammar)?;

    match args.command {
        Commands::Parse { tokens } => {
            let tokens: Vec<&str> = tokens.iter().map(|t| t.as_str()).collect();
            let parser = Parser::new(&grammar, &table);
            let outcome = parser.parse_with(&tokens, |step| {
                println!(
                    "stack: {}  |  input: {}  |  action: {}",
                    step.stack_display(),
                    step.remaining.join(" "),
                    step.action
                );
            })?;
            println!("{}", if outcome.accepted { "accepted" } else { "rejected" });
            log::debug!("{:?}", outcome.stats);
            if !outcome.accepted {
                std::process::exit(1);
            }
        }

        Commands::Dump => {
            let mut out = io::stdout().lock();
            grammar.write_productions(&mut out)?;
            table.write_states(&mut out, &grammar)?;
            table.write_actions(&mut out)?;
        }
    }

    Ok(())
}
