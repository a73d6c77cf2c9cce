//! # Error type
//!
//! [`Error`] is the single error surface of the crate. Construction-time
//! variants ([`Error::GrammarFormat`], [`Error::UnknownSymbol`]) abort grammar
//! loading; run-time variants ([`Error::AutomatonNotReady`],
//! [`Error::ParseRejected`]) are ordinary results of one call and leave the
//! automaton untouched.

use crate::{StateId, Symbol};
use smartstring::alias::String;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A grammar line (or structured rule) is malformed.
    ///
    /// `line` is 1-based; `0` means the error is not tied to a source line
    /// (structured input, configuration, or the grammar as a whole).
    #[error("grammar format error at line {line}: {message}")]
    GrammarFormat { line: usize, message: String },

    /// A symbol is neither a valid terminal nor a defined nonterminal.
    #[error("unknown symbol {symbol:?}")]
    UnknownSymbol { symbol: char },

    /// A parse was requested before the automaton was built.
    #[error("automaton is not built")]
    AutomatonNotReady,

    /// The input is not in the language.
    #[error("cannot accept {symbol} at state {state}")]
    ParseRejected { symbol: Symbol, state: StateId },
}

impl Error {
    pub(crate) fn format(line: usize, message: impl AsRef<str>) -> Self {
        Error::GrammarFormat {
            line,
            message: String::from(message.as_ref()),
        }
    }

    /// `true` for errors that do not invalidate the grammar or automaton.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::AutomatonNotReady | Error::ParseRejected { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
