//! Command-line interface for lrzero.
//!
//! Loads a grammar file, builds its LR(0) automaton and either dumps the
//! construction (`table`, `states`, `sets`) or parses expressions against it
//! (`parse`). Logging goes through `env_logger`; set `RUST_LOG=debug` to watch
//! the construction, or `RUST_LOG=trace` for closure passes and parser stacks.

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args as ClapArgs, Parser as ClapParser, Subcommand, ValueEnum};
use lrzero::{Automaton, Config, Grammar, NumberClass, Symbol, analysis};
use smartstring::alias::String as SmartString;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(ClapParser, Debug)]
#[command(version, about = "Build LR(0) automata and parse with them", long_about = None)]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    /// Command
    #[command(subcommand)]
    command: Commands,
}

#[derive(ClapArgs, Debug)]
struct ConfigArgs {
    /// Characters that match the number terminal
    #[arg(long, global = true, value_enum, default_value_t = Class::Digits)]
    number_class: Class,

    /// Left-hand side of the augmented production
    #[arg(long, global = true, value_parser = parse_symbol)]
    augmented_start: Option<Symbol>,

    /// Terminal that number-class input characters shift as
    #[arg(long, global = true, value_parser = parse_symbol)]
    number_terminal: Option<Symbol>,

    /// Extra label substitution, e.g. `F'=G` (repeatable)
    #[arg(long = "substitute", global = true, value_parser = parse_substitution)]
    substitutions: Vec<(SmartString, Symbol)>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Class {
    Digits,
    Alphanumeric,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Prints the state transition table
    Table {
        /// Grammar file, one rule per line
        #[arg(short, long)]
        grammar: PathBuf,
    },
    /// Prints the item set of every state
    States {
        #[arg(short, long)]
        grammar: PathBuf,
    },
    /// Prints productions with their FIRST and FOLLOW sets
    Sets {
        #[arg(short, long)]
        grammar: PathBuf,
    },
    /// Parses expressions, or stdin lines when none are given
    Parse {
        #[arg(short, long)]
        grammar: PathBuf,

        /// Print every parser step
        #[arg(short, long)]
        trace: bool,

        expressions: Vec<std::string::String>,
    },
}

fn parse_symbol(s: &str) -> Result<Symbol> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            Symbol::from_char(c).ok_or_else(|| anyhow!("{:?} is not a printable ASCII symbol", c))
        }
        _ => bail!("expected a single character, got {:?}", s),
    }
}

fn parse_substitution(s: &str) -> Result<(SmartString, Symbol)> {
    let (label, symbol) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected LABEL=C, got {:?}", s))?;
    if label.is_empty() {
        bail!("empty label in {:?}", s);
    }
    Ok((SmartString::from(label), parse_symbol(symbol)?))
}

impl ConfigArgs {
    fn to_config(&self) -> Config {
        let mut config = Config::default().with_number_class(match self.number_class {
            Class::Digits => NumberClass::Digits,
            Class::Alphanumeric => NumberClass::Alphanumeric,
        });
        if let Some(sym) = self.augmented_start {
            config = config.with_augmented_start(sym);
        }
        if let Some(sym) = self.number_terminal {
            config = config.with_number_terminal(sym);
        }
        for (label, sym) in &self.substitutions {
            config = config.with_substitution(label, *sym);
        }
        config
    }
}

fn load(path: &Path, config: Config) -> Result<Automaton> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("can't read grammar {:?}", path))?;
    let grammar =
        Grammar::parse(&source, config).with_context(|| format!("in grammar {:?}", path))?;
    Ok(Automaton::build(&grammar))
}

fn parse_one<W: Write>(
    automaton: &Automaton,
    text: &str,
    trace: bool,
    out: &mut W,
) -> io::Result<bool> {
    match automaton.parser().parse_str(text) {
        Ok(result) => {
            if trace {
                result.write(out, automaton)?;
            }
            writeln!(
                out,
                "{}: accepted ({} shifts, {} reductions)",
                text, result.stats.shifts, result.stats.reductions
            )?;
            Ok(true)
        }
        Err(err) => {
            writeln!(out, "{}: {}", text, err)?;
            Ok(false)
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.config.to_config();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Commands::Table { grammar } => {
            load(&grammar, config)?.write_table(&mut out)?;
        }
        Commands::States { grammar } => {
            load(&grammar, config)?.write_states(&mut out)?;
        }
        Commands::Sets { grammar } => {
            let automaton = load(&grammar, config)?;
            automaton.grammar().write_prods(&mut out)?;
            writeln!(out)?;
            analysis::write_sets(automaton.grammar(), &mut out)?;
        }
        Commands::Parse {
            grammar,
            trace,
            expressions,
        } => {
            let automaton = load(&grammar, config)?;
            let mut rejected = 0;
            if expressions.is_empty() {
                for line in io::stdin().lock().lines() {
                    let line = line.context("can't read stdin")?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    if !parse_one(&automaton, &line, trace, &mut out)? {
                        rejected += 1;
                    }
                }
            } else {
                for text in &expressions {
                    if !parse_one(&automaton, text, trace, &mut out)? {
                        rejected += 1;
                    }
                }
            }
            log::info!("{} rejected", rejected);
            if rejected > 0 {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
