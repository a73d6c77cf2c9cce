//! # Shift-reduce parser
//!
//! [`Parser`] drives a frozen [`Automaton`] over a symbol sequence. Each call
//! owns a fresh [`ParserCtx`]: a symbol stack and a state stack of equal
//! length, where `states[k]` is the state reached after the first `k`
//! symbols. Symbols are pushed first and their state is resolved right
//! after through the automaton's transition table, both for shifts and for
//! the nonterminal a reduce leaves behind.
//!
//! The parser takes a literal terminal transition when the current state has
//! one, otherwise a number-class character shifts as the generic number
//! terminal. Failing both it reduces by the state's first completed item,
//! and failing that it rejects. Reducing by the augmented production is the
//! accept, and is only allowed at the end of input.
//!
//! Reductions that consume no input are bounded: a run of them may not
//! revisit a stack configuration, nor grow the stack by more than the number
//! of automaton states. Either one means an epsilon cycle, and the parse is
//! rejected at the state it was in.

use crate::{Automaton, Error, ProdId, Result, State, StateId, Symbol};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::io::{self, Write};

/// One parser step, as recorded in a [`ParseTrace`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// `symbol` was shifted and the parser moved to `state`.
    Shift { symbol: Symbol, state: StateId },
    /// `production` was reduced and the goto on its left-hand side led to
    /// `state`.
    Reduce { production: ProdId, state: StateId },
    Accept,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserStats {
    pub tokens: usize,
    pub shifts: usize,
    pub reductions: usize,
}

/// The steps of a successful parse.
#[derive(Debug, Clone)]
pub struct ParseTrace {
    pub steps: Vec<Step>,
    pub stats: ParserStats,
}

impl ParseTrace {
    /// Writes one line per step: `shift n -> 3`, `reduce T -> n, goto 2`,
    /// `accept`.
    pub fn write<W: Write>(&self, out: &mut W, automaton: &Automaton) -> io::Result<()> {
        let g = automaton.grammar();
        for step in &self.steps {
            match step {
                Step::Shift { symbol, state } => {
                    writeln!(out, "shift {} -> {}", g.label(*symbol), state)?
                }
                Step::Reduce { production, state } => {
                    writeln!(out, "reduce {}, goto {}", g.production(*production), state)?
                }
                Step::Accept => writeln!(out, "accept")?,
            }
        }
        Ok(())
    }
}

/// Runtime configuration of one parse.
pub struct ParserCtx<'a> {
    automaton: &'a Automaton,
    symbols: Vec<Symbol>,
    states: Vec<StateId>,
    input: Vec<Symbol>,
    pos: usize,
    stats: ParserStats,
    steps: Vec<Step>,
    accepted: bool,
    // configurations reached by reductions since the last shift
    seen: HashSet<Vec<StateId>>,
    base: usize,
}

impl<'a> ParserCtx<'a> {
    /// Starts a parse of `input`; the end marker is appended here.
    ///
    /// `input` is not checked against the input alphabet. A symbol that is
    /// neither a terminal nor claimed by the number class never shifts, and
    /// a `#` inside the input is not the end of it.
    pub fn new<I>(automaton: &'a Automaton, input: I) -> Self
    where
        I: IntoIterator<Item = Symbol>,
    {
        let mut input: Vec<Symbol> = input.into_iter().collect();
        let tokens = input.len();
        input.push(Symbol::END);
        Self {
            automaton,
            symbols: vec![Symbol::END],
            states: vec![0],
            input,
            pos: 0,
            stats: ParserStats {
                tokens,
                ..ParserStats::default()
            },
            steps: Vec::new(),
            accepted: false,
            seen: HashSet::new(),
            base: 1,
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    /// Index of the next input symbol.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn stats(&self) -> &ParserStats {
        &self.stats
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Performs one shift, one reduce (with its goto), or the accept.
    ///
    /// Stacks have equal length after every step except the accept, which
    /// leaves the augmented start on the symbol stack without a state.
    pub fn step(&mut self) -> Result<Step> {
        if self.accepted {
            return Ok(Step::Accept);
        }
        let automaton = self.automaton;
        let grammar = automaton.grammar();
        let top = self.states[self.states.len() - 1];
        let state = &automaton.states()[top];
        let next = self.input[self.pos];
        let at_end = self.pos + 1 == self.input.len();

        if let Some(symbol) = self.shift_symbol(state, next, at_end) {
            self.symbols.push(symbol);
            self.pos += 1;
            let target = self.goto()?;
            self.stats.shifts += 1;
            self.seen.clear();
            self.base = self.states.len();
            return Ok(self.record(Step::Shift {
                symbol,
                state: target,
            }));
        }

        if let Some(&item) = state.reduce_item(grammar) {
            let len = grammar.production(item.production).len();
            if item.production == grammar.augmented_production() {
                if !at_end {
                    return Err(Error::ParseRejected {
                        symbol: next,
                        state: top,
                    });
                }
                self.pop(len);
                self.symbols.push(item.origin);
                self.accepted = true;
                return Ok(self.record(Step::Accept));
            }
            self.pop(len);
            self.symbols.push(item.origin);
            let target = self.goto()?;
            if self.states.len() > self.base + automaton.len()
                || !self.seen.insert(self.states.clone())
            {
                log::debug!("epsilon cycle at position {}", self.pos);
                return Err(Error::ParseRejected {
                    symbol: next,
                    state: top,
                });
            }
            self.stats.reductions += 1;
            return Ok(self.record(Step::Reduce {
                production: item.production,
                state: target,
            }));
        }

        Err(Error::ParseRejected {
            symbol: next,
            state: top,
        })
    }

    fn shift_symbol(&self, state: &State, next: Symbol, at_end: bool) -> Option<Symbol> {
        if at_end {
            return None;
        }
        if is_input_terminal(next) && state.transition(next).is_some() {
            return Some(next);
        }
        let config = self.automaton.grammar().config();
        let number = config.number_terminal();
        if config.is_number(next.as_char()) && state.transition(number).is_some() {
            return Some(number);
        }
        None
    }

    /// Resolves the state of a symbol pushed without one.
    fn goto(&mut self) -> Result<StateId> {
        let top = self.states[self.states.len() - 1];
        let symbol = self.symbols[self.symbols.len() - 1];
        match self.automaton.goto(top, symbol) {
            Some(target) => {
                self.states.push(target);
                Ok(target)
            }
            None => {
                log::error!("no transition on {} from state {}", symbol, top);
                Err(Error::ParseRejected { symbol, state: top })
            }
        }
    }

    fn pop(&mut self, n: usize) {
        let keep = self.symbols.len() - n;
        self.symbols.truncate(keep);
        self.states.truncate(keep);
    }

    fn record(&mut self, step: Step) -> Step {
        self.steps.push(step);
        step
    }

    pub fn into_trace(self) -> ParseTrace {
        ParseTrace {
            steps: self.steps,
            stats: self.stats,
        }
    }

    pub fn dump_state(&self) {
        let mut output = String::new();
        for (i, sym) in self.symbols.iter().enumerate() {
            match self.states.get(i) {
                Some(state) => {
                    let _ = write!(output, "<{}> {}  ", state, sym);
                }
                None => {
                    let _ = write!(output, "<?> {}  ", sym);
                }
            }
        }
        output.push_str("<-  ");
        for sym in &self.input[self.pos..] {
            output.push(sym.as_char());
        }
        log::trace!("{}", output);
    }
}

/// A terminal that may appear in input: anything but the end marker.
fn is_input_terminal(sym: Symbol) -> bool {
    sym.is_valid() && sym.is_terminal() && !sym.is_end()
}

/// Runs parses against one automaton.
#[derive(Clone, Copy)]
pub struct Parser<'a> {
    automaton: &'a Automaton,
}

impl<'a> Parser<'a> {
    pub fn new(automaton: &'a Automaton) -> Self {
        Self { automaton }
    }

    /// Parses `input`.
    ///
    /// Every symbol must be a terminal other than `#`, or a character of the
    /// number class; anything else is [`Error::UnknownSymbol`].
    pub fn parse<I>(&self, input: I) -> Result<ParseTrace>
    where
        I: IntoIterator<Item = Symbol>,
    {
        let config = self.automaton.grammar().config();
        let input = input
            .into_iter()
            .map(|sym| {
                if is_input_terminal(sym) || (sym.is_valid() && config.is_number(sym.as_char())) {
                    Ok(sym)
                } else {
                    Err(Error::UnknownSymbol {
                        symbol: sym.as_char(),
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;
        let mut ctx = ParserCtx::new(self.automaton, input);
        loop {
            if log::log_enabled!(log::Level::Trace) {
                ctx.dump_state();
            }
            match ctx.step() {
                Ok(Step::Accept) => {
                    log::trace!("Accept");
                    return Ok(ctx.into_trace());
                }
                Ok(step) => log::trace!("{:?}", step),
                Err(err) => {
                    log::debug!("rejected: {}", err);
                    return Err(err);
                }
            }
        }
    }

    /// Parses text, one symbol per character; whitespace is skipped.
    pub fn parse_str(&self, text: &str) -> Result<ParseTrace> {
        let input = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| Symbol::from_char(c).ok_or(Error::UnknownSymbol { symbol: c }))
            .collect::<Result<Vec<_>>>()?;
        self.parse(input)
    }

    pub fn accepts(&self, text: &str) -> bool {
        self.parse_str(text).is_ok()
    }
}

impl Automaton {
    pub fn parser(&self) -> Parser<'_> {
        Parser::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Grammar, NumberClass};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sym(c: char) -> Symbol {
        Symbol::from_char(c).unwrap()
    }

    fn build(src: &str) -> Automaton {
        Automaton::build(&Grammar::parse(src, Config::default()).unwrap())
    }

    #[test]
    fn accepts_and_traces() {
        init_logger();
        let a = build("E -> E+T | T\nT -> T*n | n");
        let trace = a.parser().parse_str("n*n").unwrap();
        assert_eq!(
            trace.steps,
            vec![
                Step::Shift { symbol: sym('n'), state: 3 },
                Step::Reduce { production: 4, state: 2 },
                Step::Shift { symbol: sym('*'), state: 5 },
                Step::Shift { symbol: sym('n'), state: 7 },
                Step::Reduce { production: 3, state: 2 },
                Step::Reduce { production: 2, state: 1 },
                Step::Accept,
            ]
        );
        assert_eq!(
            trace.stats,
            ParserStats {
                tokens: 3,
                shifts: 3,
                reductions: 3
            }
        );
    }

    #[test]
    fn rejects_at_end_of_input() {
        let a = build("E -> E+T | T\nT -> T*n | n");
        let err = a.parser().parse_str("n*").unwrap_err();
        assert_eq!(
            err,
            Error::ParseRejected {
                symbol: Symbol::END,
                state: 5
            }
        );
        assert_eq!(err.to_string(), "cannot accept # at state 5");
    }

    #[test]
    fn numbers_match_the_number_terminal() {
        let a = build("E -> E+T | E-T | T\nT -> T*n | n");
        let trace = a.parser().parse_str("3*2-1").unwrap();
        assert_eq!(trace.stats.shifts, 5);
        assert!(trace
            .steps
            .iter()
            .all(|s| !matches!(s, Step::Shift { symbol, .. } if symbol.as_char().is_ascii_digit())));
        assert!(a.parser().accepts(" 1 + 7 "));
        // every character is its own token
        assert!(!a.parser().accepts("12"));
        assert!(!a.parser().accepts("x+1"));
    }

    #[test]
    fn alphanumeric_number_class() {
        let config = Config::default().with_number_class(NumberClass::Alphanumeric);
        let g = Grammar::parse("E -> E+n | n", config).unwrap();
        let a = Automaton::build(&g);
        assert!(a.parser().accepts("x+y+1"));
        assert!(!a.parser().accepts("x+"));
    }

    #[test]
    fn literal_transition_wins_over_number_class() {
        let g = Grammar::parse("S -> 1n | n", Config::default()).unwrap();
        let a = Automaton::build(&g);
        assert!(a.parser().accepts("12"));
        assert!(a.parser().accepts("7"));
        assert!(a.parser().accepts("1n"));
    }

    #[test]
    fn early_accept_is_rejected() {
        let a = build("S -> S+n | S*n | n | (S)");
        let err = a.parser().parse_str("n+n)").unwrap_err();
        let Error::ParseRejected { symbol, state } = err else {
            panic!("unexpected {:?}", err);
        };
        assert_eq!(symbol, sym(')'));
        assert_eq!(state, a.goto(0, sym('S')).unwrap());
    }

    #[test]
    fn stacks_stay_paired() {
        let a = build("S -> S+n | S*n | n | (S)");
        let mut ctx = ParserCtx::new(&a, "(n+n)*n".chars().map(sym));
        assert_eq!(ctx.symbols(), &[Symbol::END]);
        assert_eq!(ctx.states(), &[0]);
        loop {
            let step = ctx.step().unwrap();
            if step == Step::Accept {
                break;
            }
            assert_eq!(ctx.symbols().len(), ctx.states().len());
        }
        assert!(ctx.is_accepted());
        assert_eq!(ctx.symbols(), &[Symbol::END, sym('Y')]);
        assert_eq!(ctx.step().unwrap(), Step::Accept);
        assert_eq!(ctx.stats().shifts, 7);
    }

    #[test]
    fn epsilon_productions() {
        let a = build("S -> aSb | e");
        assert!(a.parser().accepts(""));
        assert!(a.parser().accepts("ab"));
        assert!(a.parser().accepts("aaabbb"));
        assert!(!a.parser().accepts("aab"));
        assert!(!a.parser().accepts("abb"));
    }

    #[test]
    fn unknown_input_character() {
        let a = build("S -> n");
        assert_eq!(
            a.parser().parse_str("é").unwrap_err(),
            Error::UnknownSymbol { symbol: 'é' }
        );
    }

    #[test]
    fn end_marker_in_input() {
        let a = build("S -> S+n | S*n | n | (S)");
        let p = a.parser();
        assert_eq!(
            p.parse_str("n#+n)").unwrap_err(),
            Error::UnknownSymbol { symbol: '#' }
        );
        let b = build("S -> aSb | e");
        assert_eq!(
            b.parser().parse_str("#ab").unwrap_err(),
            Error::UnknownSymbol { symbol: '#' }
        );

        // a context given `#` directly reads past it instead of accepting
        let mut ctx = ParserCtx::new(&b, "#ab".chars().map(sym));
        let err = loop {
            match ctx.step() {
                Ok(Step::Accept) => panic!("accepted with input left"),
                Ok(_) => {}
                Err(err) => break err,
            }
        };
        assert!(matches!(err, Error::ParseRejected { symbol, .. } if symbol == Symbol::END));
        assert_eq!(ctx.position(), 0);
    }

    #[test]
    fn nonterminals_in_input() {
        let a = build("S -> S+n | S*n | n | (S)");
        let p = a.parser();
        assert_eq!(
            p.parse_str("(S)+n").unwrap_err(),
            Error::UnknownSymbol { symbol: 'S' }
        );
        assert_eq!(
            p.parse([Symbol::new(b'S')]).unwrap_err(),
            Error::UnknownSymbol { symbol: 'S' }
        );
        assert_eq!(
            p.parse_str("n+e").unwrap_err(),
            Error::UnknownSymbol { symbol: 'e' }
        );

        let mut ctx = ParserCtx::new(&a, [Symbol::new(b'S')]);
        assert!(matches!(
            ctx.step(),
            Err(Error::ParseRejected { state: 0, .. })
        ));

        // the number class may claim letters, which then shift as `n`
        let config = Config::default().with_number_class(NumberClass::Alphanumeric);
        let g = Grammar::parse("S -> S+n | n", config).unwrap();
        let a = Automaton::build(&g);
        let trace = a.parser().parse_str("S+e").unwrap();
        assert_eq!(trace.stats.shifts, 3);
    }

    #[test]
    fn epsilon_cycles_are_rejected() {
        let a = build("S -> Ab\nA -> AB | e\nB -> e");
        let err = a.parser().parse_str("").unwrap_err();
        assert!(matches!(err, Error::ParseRejected { symbol, .. } if symbol == Symbol::END));

        let mut ctx = ParserCtx::new(&a, []);
        let mut steps = 0;
        while ctx.step().is_ok() {
            steps += 1;
            assert!(steps < 100, "no progress at position {}", ctx.position());
        }

        // a stack that grows without consuming input is cut off
        let a = build("S -> BS | b\nB -> e");
        assert!(matches!(
            a.parser().parse_str(""),
            Err(Error::ParseRejected { symbol, .. }) if symbol == Symbol::END
        ));
        assert!(a.parser().accepts("b"));
    }

    #[test]
    fn writes_trace() {
        let a = build("S -> (S) | n");
        let trace = a.parser().parse_str("(1)").unwrap();
        let mut out = Vec::new();
        trace.write(&mut out, &a).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "shift ( -> 2\nshift n -> 3\nreduce S -> n, goto 4\nshift ) -> 5\nreduce S -> (S), goto 1\naccept\n"
        );
    }
}
