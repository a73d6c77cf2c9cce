//! # FIRST and FOLLOW sets
//!
//! Diagnostic fixed-point computations over a [`Grammar`]. The LR(0)
//! automaton never consults them; they are what a reader needs to tell
//! whether an LR(0) conflict would disappear under SLR(1) lookahead.

use crate::{Grammar, Symbol};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::io::{self, Write};

/// FIRST sets and nullability of every nonterminal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FirstSets {
    first: IndexMap<Symbol, BTreeSet<Symbol>>,
    nullable: IndexMap<Symbol, bool>,
}

impl FirstSets {
    /// FIRST of a single symbol. A terminal is its own FIRST set.
    pub fn first(&self, sym: Symbol) -> BTreeSet<Symbol> {
        if sym.is_nonterminal() {
            self.first.get(&sym).cloned().unwrap_or_default()
        } else if sym.is_empty() {
            BTreeSet::new()
        } else {
            BTreeSet::from([sym])
        }
    }

    pub fn is_nullable(&self, sym: Symbol) -> bool {
        sym.is_empty() || self.nullable.get(&sym).copied().unwrap_or(false)
    }

    /// FIRST of a symbol sequence, and whether the whole sequence is
    /// nullable.
    pub fn first_of_sequence(&self, seq: &[Symbol]) -> (BTreeSet<Symbol>, bool) {
        let mut out = BTreeSet::new();
        for &sym in seq {
            out.extend(self.first(sym));
            if !self.is_nullable(sym) {
                return (out, false);
            }
        }
        (out, true)
    }

    /// Nonterminals in grammar order with their FIRST sets.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &BTreeSet<Symbol>)> {
        self.first.iter().map(|(s, f)| (*s, f))
    }
}

/// Computes FIRST sets and nullability for every nonterminal.
pub fn first_sets(grammar: &Grammar) -> FirstSets {
    let mut sets = FirstSets::default();
    for nt in grammar.nonterminals() {
        sets.first.insert(nt, BTreeSet::new());
        sets.nullable.insert(nt, false);
    }
    let mut changed = true;
    while changed {
        changed = false;
        for prod in grammar.productions() {
            let (first, nullable) = sets.first_of_sequence(prod.rhs());
            let entry = sets.first.entry(prod.lhs()).or_default();
            for f in first {
                changed |= entry.insert(f);
            }
            if nullable && !sets.is_nullable(prod.lhs()) {
                sets.nullable.insert(prod.lhs(), true);
                changed = true;
            }
        }
    }
    sets
}

/// Computes FOLLOW sets for every nonterminal.
///
/// The end marker `#` follows both the start symbol and the augmented start.
pub fn follow_sets(grammar: &Grammar, first: &FirstSets) -> IndexMap<Symbol, BTreeSet<Symbol>> {
    let mut follow: IndexMap<Symbol, BTreeSet<Symbol>> = grammar
        .nonterminals()
        .map(|nt| (nt, BTreeSet::new()))
        .collect();
    for sym in [grammar.augmented_start(), grammar.start()] {
        follow.entry(sym).or_default().insert(Symbol::END);
    }
    let mut changed = true;
    while changed {
        changed = false;
        for prod in grammar.productions() {
            let rhs = prod.rhs();
            for (i, &sym) in rhs.iter().enumerate() {
                if !sym.is_nonterminal() {
                    continue;
                }
                let (mut add, nullable) = first.first_of_sequence(&rhs[i + 1..]);
                if nullable {
                    add.extend(follow.get(&prod.lhs()).cloned().unwrap_or_default());
                }
                let entry = follow.entry(sym).or_default();
                for f in add {
                    changed |= entry.insert(f);
                }
            }
        }
    }
    follow
}

/// Writes `FIRST,<N>,<symbols>` and `FOLLOW,<N>,<symbols>` lines, with a
/// trailing `,e` on FIRST lines of nullable nonterminals.
pub fn write_sets<W: Write>(grammar: &Grammar, out: &mut W) -> io::Result<()> {
    let first = first_sets(grammar);
    let follow = follow_sets(grammar, &first);
    let join = |set: &BTreeSet<Symbol>| {
        set.iter()
            .map(|s| grammar.label(*s).to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };
    for (nt, set) in first.iter() {
        write!(out, "FIRST,{},{}", grammar.label(nt), join(set))?;
        if first.is_nullable(nt) {
            write!(out, ",{}", Symbol::EMPTY)?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;
    for (nt, set) in &follow {
        writeln!(out, "FOLLOW,{},{}", grammar.label(*nt), join(set))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn sym(c: char) -> Symbol {
        Symbol::from_char(c).unwrap()
    }

    fn set(s: &str) -> BTreeSet<Symbol> {
        s.chars().map(sym).collect()
    }

    #[test]
    fn expression_first_and_follow() {
        let g = Grammar::parse("E -> E+T | T\nT -> T*n | (E)", Config::default()).unwrap();
        let first = first_sets(&g);
        assert_eq!(first.first(sym('E')), set("("));
        assert_eq!(first.first(sym('T')), set("("));
        assert_eq!(first.first(sym('+')), set("+"));
        assert!(!first.is_nullable(sym('E')));

        let follow = follow_sets(&g, &first);
        assert_eq!(follow[&sym('E')], set("#+)"));
        assert_eq!(follow[&sym('T')], set("#+)*"));
        assert_eq!(follow[&sym('Y')], set("#"));
    }

    #[test]
    fn nullable_nonterminals() {
        let g = Grammar::parse("S -> AB\nA -> a | e\nB -> b | e", Config::default()).unwrap();
        let first = first_sets(&g);
        assert!(first.is_nullable(sym('A')));
        assert!(first.is_nullable(sym('S')));
        assert_eq!(first.first(sym('S')), set("ab"));
        assert_eq!(first.first_of_sequence(&[sym('A'), sym('c')]), (set("ac"), false));

        let follow = follow_sets(&g, &first);
        assert_eq!(follow[&sym('A')], set("b#"));
        assert_eq!(follow[&sym('B')], set("#"));
    }

    #[test]
    fn writes_sets() {
        let g = Grammar::parse("S -> aS | e", Config::default()).unwrap();
        let mut out = Vec::new();
        write_sets(&g, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "FIRST,Y,a,e\nFIRST,S,a,e\n\nFOLLOW,Y,#\nFOLLOW,S,#\n"
        );
    }
}
