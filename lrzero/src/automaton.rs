//! # LR(0) automaton
//!
//! [`Automaton::build`] runs the canonical-collection worklist: starting from
//! the closure of `Start' -> .Start` (state `0`), it visits states in
//! creation order, computes [`goto`] for every symbol that appears at a dot,
//! and either reuses a set-equal state or appends a new one. Appending only
//! ever happens at the end of the state list, so the loop re-reads its length
//! on every iteration and terminates once no new states are discovered.
//!
//! The finished automaton is frozen: parsing only reads it, so one automaton
//! can serve any number of parses, on any number of threads.
//!
//! Shift/reduce and reduce/reduce conflicts are not resolved here. They are
//! logged at `warn` level and left to the parser's deterministic tie-break.

use crate::closure::{closure, goto};
use crate::item::canonical_key;
use crate::{Conflict, Grammar, Item, ItemSet, State, StateId, Symbol};
use std::collections::HashMap;
use std::io::{self, Write};

#[derive(Clone, Debug)]
pub struct Automaton {
    grammar: Grammar,
    states: Vec<State>,
}

impl Automaton {
    /// Builds the automaton for `grammar`.
    ///
    /// A grammar whose item sets never stop growing makes this loop forever;
    /// well-formedness of the grammar is the caller's responsibility.
    pub fn build(grammar: &Grammar) -> Automaton {
        let grammar = grammar.clone();
        let mut states: Vec<State> = Vec::new();
        let mut index: HashMap<Vec<Item>, StateId> = HashMap::new();

        let kernel: ItemSet = [Item::start(&grammar)].into_iter().collect();
        let initial = closure(&kernel, &grammar);
        index.insert(canonical_key(&initial), 0);
        states.push(State::new(0, initial, &grammar));

        let mut i = 0;
        while i < states.len() {
            for sym in states[i].outgoing_symbols(&grammar) {
                let next = goto(states[i].items(), sym, &grammar);
                let target = match index.get(&canonical_key(&next)) {
                    Some(&id) => id,
                    None => {
                        let id = states.len();
                        index.insert(canonical_key(&next), id);
                        log::debug!("state {}: {} items", id, next.len());
                        states.push(State::new(id, next, &grammar));
                        id
                    }
                };
                log::debug!("transition {} --{}--> {}", i, sym, target);
                states[i].transitions.insert(sym, target);
            }
            i += 1;
        }

        let automaton = Automaton { grammar, states };
        for (id, conflict) in automaton.conflicts() {
            log::warn!("state {}: {}", id, automaton.describe(&conflict));
        }
        log::debug!("automaton: {} states", automaton.states.len());
        automaton
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id)
    }

    /// State `0`, built from `Start' -> .Start`.
    pub fn initial(&self) -> &State {
        &self.states[0]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always `false`: a built automaton has at least its initial state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The transition from `state` on `sym`, if any.
    pub fn goto(&self, state: StateId, sym: Symbol) -> Option<StateId> {
        self.states.get(state)?.transition(sym)
    }

    /// Every state whose choice the automaton leaves unresolved.
    pub fn conflicts(&self) -> Vec<(StateId, Conflict)> {
        self.states
            .iter()
            .filter_map(|s| s.conflict(&self.grammar).map(|c| (s.id(), c)))
            .collect()
    }

    fn describe(&self, conflict: &Conflict) -> String {
        let g = &self.grammar;
        match conflict {
            Conflict::ShiftReduce { reduce, shifts } => format!(
                "shift/reduce conflict: reduce {} or shift {}",
                g.production(*reduce),
                shifts.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(" ")
            ),
            Conflict::ReduceReduce { reduces } => format!(
                "reduce/reduce conflict: {}",
                reduces
                    .iter()
                    .map(|p| g.production(*p).to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    /// Writes the transition table.
    ///
    /// One row per state: its id, whether it can reduce, then the target
    /// state for every terminal column followed by every nonterminal column.
    /// The augmented start has no column since nothing transitions on it.
    ///
    /// ```text
    ///  state reduce    +    *    n    #    E    T
    ///      0     no              3         1    2
    ///      1    yes    4
    /// ```
    pub fn write_table<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let g = &self.grammar;
        let columns: Vec<Symbol> = g
            .terminals()
            .chain(g.nonterminals().filter(|s| *s != g.augmented_start()))
            .collect();
        write!(out, "{:>6} {:>6}", "state", "reduce")?;
        for sym in &columns {
            write!(out, "{:>5}", g.label(*sym).as_str())?;
        }
        writeln!(out)?;
        for state in &self.states {
            write!(
                out,
                "{:>6} {:>6}",
                state.id(),
                if state.can_reduce() { "yes" } else { "no" }
            )?;
            for sym in &columns {
                match state.transition(*sym) {
                    Some(target) => write!(out, "{:>5}", target)?,
                    None => write!(out, "{:>5}", "")?,
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Writes every state's items, one `C,<state>,<item>` line per item.
    pub fn write_states<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "CS,{}\n", self.states.len())?;
        for state in &self.states {
            for item in state.items() {
                writeln!(out, "C,{},{}", state.id(), item.display(&self.grammar))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// The table rendered by [`write_table`](Self::write_table) as a string.
    pub fn table(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_table(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
