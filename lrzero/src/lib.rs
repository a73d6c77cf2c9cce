//! # lrzero
//!
//! LR(0) automaton construction and table-driven shift-reduce recognition
//! for small single-character grammars.
//!
//! A [`Grammar`] is loaded from text, augmented with `Y -> Start`, and turned
//! into an [`Automaton`] by the canonical-collection construction. The frozen
//! automaton drives any number of [`Parser`] runs.
//!
//! ```rust
//! use lrzero::{Automaton, Config, Error, Grammar};
//!
//! let grammar = Grammar::parse("S -> S+n | S*n | n | (S)", Config::default()).unwrap();
//! let automaton = Automaton::build(&grammar);
//! let parser = automaton.parser();
//!
//! let trace = parser.parse_str("(1+2)*3").unwrap();
//! assert_eq!(trace.stats.shifts, 7);
//! assert!(matches!(parser.parse_str("n+n)"), Err(Error::ParseRejected { .. })));
//! ```

pub mod analysis;
mod automaton;
pub mod closure;
mod config;
mod error;
mod grammar;
mod item;
mod parser;
mod recognizer;
mod symbol;

pub use crate::automaton::Automaton;
pub use crate::config::{Config, NumberClass};
pub use crate::error::{Error, Result};
pub use crate::grammar::{Grammar, ProdId, Production};
pub use crate::item::{Conflict, Item, ItemDisplay, ItemSet, State, StateId, same_items};
pub use crate::parser::{ParseTrace, Parser, ParserCtx, ParserStats, Step};
pub use crate::recognizer::Recognizer;
pub use crate::symbol::Symbol;
