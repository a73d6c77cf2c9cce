//! # Recognizer
//!
//! A grammar that carries its automaton once [`Recognizer::build`] has run.

use crate::{Automaton, Error, Grammar, ParseTrace, Result};

/// A grammar paired with its automaton, built on demand.
///
/// Parsing before [`build`](Self::build) fails with
/// [`Error::AutomatonNotReady`].
#[derive(Clone, Debug)]
pub struct Recognizer {
    grammar: Grammar,
    automaton: Option<Automaton>,
}

impl Recognizer {
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            automaton: None,
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Builds the automaton. Later calls keep the existing one.
    pub fn build(&mut self) -> &Automaton {
        let grammar = &self.grammar;
        self.automaton
            .get_or_insert_with(|| Automaton::build(grammar))
    }

    pub fn is_ready(&self) -> bool {
        self.automaton.is_some()
    }

    pub fn automaton(&self) -> Result<&Automaton> {
        self.automaton.as_ref().ok_or(Error::AutomatonNotReady)
    }

    pub fn parse(&self, text: &str) -> Result<ParseTrace> {
        self.automaton()?.parser().parse_str(text)
    }
}
