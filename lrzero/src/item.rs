//! # Items and states
//!
//! An [`Item`] is a production with a dot marking how much of its right-hand
//! side has been matched, plus the nonterminal it was expanded for. Items are
//! plain values: equality and hashing are structural, so two items
//! synthesized along different expansion paths collapse to one.
//!
//! A [`State`] owns a deduplicated [`ItemSet`] (kernel and closure together),
//! its outgoing transitions and its reduce capability. States refer to one
//! another only through [`StateId`]s.

use crate::{Grammar, ProdId, Symbol};
use indexmap::{IndexMap, IndexSet};
use std::fmt;

/// Index of a state in its [`Automaton`](crate::Automaton).
pub type StateId = usize;

/// A production with a dot position and an origin nonterminal.
///
/// For example `E -> E.+T` is the production `E -> E+T` with the dot after
/// the first symbol.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Item {
    /// The production index in the grammar.
    pub production: ProdId,
    /// Number of right-hand-side symbols already matched.
    pub dot: usize,
    /// The nonterminal whose expansion introduced this item.
    pub origin: Symbol,
}

impl Item {
    pub fn new(production: ProdId, dot: usize, origin: Symbol) -> Self {
        Self {
            production,
            dot,
            origin,
        }
    }

    /// The item `Start' -> .Start` every automaton begins with.
    pub fn start(grammar: &Grammar) -> Self {
        Self::new(grammar.augmented_production(), 0, grammar.augmented_start())
    }

    /// The successor item with the dot moved one symbol to the right.
    ///
    /// `self` is left untouched; it stays valid in the state it came from.
    pub fn advance(&self) -> Item {
        Item {
            dot: self.dot + 1,
            ..*self
        }
    }

    /// The symbol right after the dot, or `None` for a completed item.
    pub fn symbol_at_dot(&self, grammar: &Grammar) -> Option<Symbol> {
        grammar.production(self.production).rhs().get(self.dot).copied()
    }

    /// `true` once the dot has passed the whole right-hand side.
    pub fn is_complete(&self, grammar: &Grammar) -> bool {
        self.dot == grammar.production(self.production).len()
    }

    /// Renders the item as `E -> E.+T`.
    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> ItemDisplay<'a> {
        ItemDisplay {
            item: self,
            grammar,
        }
    }
}

pub struct ItemDisplay<'a> {
    item: &'a Item,
    grammar: &'a Grammar,
}

impl fmt::Display for ItemDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.grammar;
        let p = g.production(self.item.production);
        write!(f, "{} -> ", g.label(self.item.origin))?;
        for (j, sym) in p.rhs().iter().enumerate() {
            if j == self.item.dot {
                write!(f, ".")?;
            }
            write!(f, "{}", g.label(*sym))?;
        }
        if p.len() == self.item.dot {
            write!(f, ".")?;
        }
        Ok(())
    }
}

/// An insertion-ordered set of items.
///
/// Comparison with `==` is set equality and ignores order; iteration order
/// is the order in which items were discovered.
pub type ItemSet = IndexSet<Item>;

/// Full set equality: same cardinality and every item contained both ways.
pub fn same_items(a: &ItemSet, b: &ItemSet) -> bool {
    a.len() == b.len()
        && a.iter().all(|item| b.contains(item))
        && b.iter().all(|item| a.contains(item))
}

/// An order-independent key for an item set, used to dedup states by hash.
pub fn canonical_key(items: &ItemSet) -> Vec<Item> {
    let mut key: Vec<Item> = items.iter().copied().collect();
    key.sort_unstable();
    key
}

/// A conflict an LR(0) state leaves unresolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Conflict {
    /// The state can shift `shifts` and also reduce by `reduce`.
    ShiftReduce { reduce: ProdId, shifts: Vec<Symbol> },
    /// The state can reduce by more than one production.
    ReduceReduce { reduces: Vec<ProdId> },
}

/// One automaton state.
#[derive(Clone, Debug)]
pub struct State {
    id: StateId,
    items: ItemSet,
    pub(crate) transitions: IndexMap<Symbol, StateId>,
    can_reduce: bool,
}

impl State {
    pub(crate) fn new(id: StateId, items: ItemSet, grammar: &Grammar) -> Self {
        let can_reduce = items.iter().any(|item| item.is_complete(grammar));
        Self {
            id,
            items,
            transitions: IndexMap::new(),
            can_reduce,
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn items(&self) -> &ItemSet {
        &self.items
    }

    /// Outgoing transitions in the order they were recorded.
    pub fn transitions(&self) -> &IndexMap<Symbol, StateId> {
        &self.transitions
    }

    pub fn transition(&self, sym: Symbol) -> Option<StateId> {
        self.transitions.get(&sym).copied()
    }

    pub fn can_reduce(&self) -> bool {
        self.can_reduce
    }

    pub fn completed_items<'a>(
        &'a self,
        grammar: &'a Grammar,
    ) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.iter().filter(move |item| item.is_complete(grammar))
    }

    /// The completed item a reduce uses: the first one in stored order.
    pub fn reduce_item(&self, grammar: &Grammar) -> Option<&Item> {
        self.items.iter().find(|item| item.is_complete(grammar))
    }

    /// Symbols with an item whose dot is in front of them, first occurrence
    /// first.
    pub fn outgoing_symbols(&self, grammar: &Grammar) -> Vec<Symbol> {
        let syms: IndexSet<Symbol> = self
            .items
            .iter()
            .filter_map(|item| item.symbol_at_dot(grammar))
            .collect();
        syms.into_iter().collect()
    }

    /// Classifies the state's unresolved choice, if it has one.
    ///
    /// The augmented production's completed item is the accept action and
    /// takes part in no conflict.
    pub fn conflict(&self, grammar: &Grammar) -> Option<Conflict> {
        let aug = grammar.augmented_production();
        let reduces: Vec<ProdId> = self
            .completed_items(grammar)
            .map(|item| item.production)
            .filter(|&p| p != aug)
            .collect();
        match reduces.len() {
            0 => None,
            1 => {
                let shifts: Vec<Symbol> = self
                    .outgoing_symbols(grammar)
                    .into_iter()
                    .filter(|s| s.is_terminal())
                    .collect();
                if shifts.is_empty() {
                    None
                } else {
                    Some(Conflict::ShiftReduce {
                        reduce: reduces[0],
                        shifts,
                    })
                }
            }
            _ => Some(Conflict::ReduceReduce { reduces }),
        }
    }
}
