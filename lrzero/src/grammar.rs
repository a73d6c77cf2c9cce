//! # Grammar model and loader
//!
//! A [`Grammar`] maps each nonterminal to the ordered list of its alternative
//! [`Production`]s and is always *augmented*: production `0` is the synthetic
//! `Start' -> Start`, whose left-hand side is the reserved
//! [`Config::augmented_start`] symbol. Reducing by it is how the parser
//! recognises acceptance.
//!
//! Grammars are loaded from text with [`Grammar::parse`] or from structured
//! rules with [`Grammar::new`]. The text format is one rule per line:
//!
//! ```text
//! E -> E+T | T
//! T -> T*n | n
//! ```
//!
//! Whitespace is insignificant, every character of an alternative is one
//! symbol, and the alternative `e` denotes the empty production. Multi-character
//! labels such as `E'` are rewritten to single symbols through
//! [`Config::substitute`] before splitting.
//!
//! ## Example
//! ```rust
//! # use lrzero::{Config, Grammar, Symbol};
//! let g = Grammar::parse("E -> E+T | T\nT -> T*n | n", Config::default()).unwrap();
//! assert_eq!(g.start(), Symbol::new(b'E'));
//! assert_eq!(g.productions().len(), 5); // including Y -> E
//! assert_eq!(g.productions_of(Symbol::new(b'T')).unwrap().len(), 2);
//! ```

use crate::{Config, Error, Result, Symbol};
use indexmap::{IndexMap, IndexSet};
use smartstring::alias::String;
use std::fmt;
use std::io::{self, Write};

/// Index of a production in [`Grammar::productions`].
pub type ProdId = usize;

/// A left-hand-side nonterminal and its right-hand-side symbols.
///
/// An empty right-hand side is an epsilon production.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Production {
    lhs: Symbol,
    rhs: Vec<Symbol>,
}

impl Production {
    pub fn new(lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Self { lhs, rhs }
    }

    pub fn lhs(&self) -> Symbol {
        self.lhs
    }

    pub fn rhs(&self) -> &[Symbol] {
        &self.rhs
    }

    /// Number of right-hand-side symbols.
    pub fn len(&self) -> usize {
        self.rhs.len()
    }

    /// `true` for an epsilon production.
    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> ", self.lhs)?;
        if self.rhs.is_empty() {
            return write!(f, "{}", Symbol::EMPTY);
        }
        for sym in &self.rhs {
            write!(f, "{}", sym)?;
        }
        Ok(())
    }
}

/// An augmented context-free grammar over single-character symbols.
#[derive(Clone, Debug)]
pub struct Grammar {
    config: Config,
    productions: Vec<Production>,
    alternatives: IndexMap<Symbol, Vec<ProdId>>,
    terminals: IndexSet<Symbol>,
    start: Symbol,
}

impl Grammar {
    /// Builds a grammar from structured rules.
    ///
    /// Each rule is a left-hand side and its alternatives; an alternative of
    /// `[Symbol::EMPTY]` (or an empty vector) is an epsilon production. The
    /// first rule's left-hand side is the start symbol.
    pub fn new<I>(config: Config, rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Symbol, Vec<Vec<Symbol>>)>,
    {
        let mut rules_acc = Rules::new(config)?;
        for (lhs, alts) in rules {
            let alts = alts
                .into_iter()
                .map(|alt| if alt.is_empty() { vec![Symbol::EMPTY] } else { alt })
                .collect();
            rules_acc.add(0, lhs, alts)?;
        }
        rules_acc.finish()
    }

    /// Loads a grammar from `LHS -> alt1 | alt2` lines.
    pub fn parse(source: &str, config: Config) -> Result<Self> {
        let mut rules = Rules::new(config)?;
        for (i, raw) in source.lines().enumerate() {
            let line = i + 1;
            let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
            if stripped.is_empty() {
                continue;
            }
            let text = rules.config.substitute(&stripped);
            let parts: Vec<&str> = text.split("->").collect();
            if parts.len() != 2 {
                return Err(Error::format(line, "expected exactly one `->`"));
            }
            let lhs = symbols(parts[0])?;
            if lhs.len() != 1 {
                return Err(Error::format(
                    line,
                    "left-hand side must be a single symbol",
                ));
            }
            let alts = parts[1].split('|').map(symbols).collect::<Result<Vec<_>>>()?;
            rules.add(line, lhs[0], alts)?;
        }
        rules.finish()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The original (user) start symbol.
    pub fn start(&self) -> Symbol {
        self.start
    }

    /// The reserved left-hand side of the augmented production.
    pub fn augmented_start(&self) -> Symbol {
        self.config.augmented_start()
    }

    /// Id of `Start' -> Start`.
    pub fn augmented_production(&self) -> ProdId {
        0
    }

    pub fn is_terminal(&self, sym: Symbol) -> bool {
        sym.is_terminal()
    }

    pub fn is_nonterminal(&self, sym: Symbol) -> bool {
        sym.is_nonterminal()
    }

    pub fn is_empty(&self, sym: Symbol) -> bool {
        sym.is_empty()
    }

    /// Alternatives of `nt`, in source order.
    pub fn productions_of(&self, nt: Symbol) -> Result<&[ProdId]> {
        self.alternatives
            .get(&nt)
            .map(Vec::as_slice)
            .ok_or(Error::UnknownSymbol {
                symbol: nt.as_char(),
            })
    }

    /// Panics if `id` was not issued by this grammar.
    pub fn production(&self, id: ProdId) -> &Production {
        &self.productions[id]
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Terminals in order of first appearance; the end marker comes last.
    pub fn terminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.terminals.iter().copied()
    }

    /// Nonterminals in definition order; the augmented start comes first.
    pub fn nonterminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.alternatives.keys().copied()
    }

    /// Display label of a symbol, undoing the loader's substitutions.
    pub fn label(&self, sym: Symbol) -> String {
        match self.config.label(sym) {
            Some(label) => String::from(label),
            None => {
                let mut s = String::new();
                s.push(sym.as_char());
                s
            }
        }
    }

    /// Writes every production, one per line, as `P,<id>,<lhs> -> <rhs>`.
    pub fn write_prods<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "PS,{}\n", self.productions.len())?;
        for (i, prod) in self.productions.iter().enumerate() {
            write!(out, "P,{},{} ->", i, self.label(prod.lhs()))?;
            if prod.is_empty() {
                write!(out, " {}", Symbol::EMPTY)?;
            }
            for sym in prod.rhs() {
                write!(out, " {}", self.label(*sym))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

fn symbols(text: &str) -> Result<Vec<Symbol>> {
    text.chars()
        .map(|c| Symbol::from_char(c).ok_or(Error::UnknownSymbol { symbol: c }))
        .collect()
}

/// Rule accumulator shared by both loading paths.
struct Rules {
    config: Config,
    rules: IndexMap<Symbol, Vec<Vec<Symbol>>>,
}

impl Rules {
    fn new(config: Config) -> Result<Self> {
        let aug = config.augmented_start();
        if !aug.is_valid() || !aug.is_nonterminal() {
            return Err(Error::format(
                0,
                format!("augmented start {:?} is not a nonterminal", aug),
            ));
        }
        let num = config.number_terminal();
        if !num.is_valid() || !num.is_terminal() || num.is_end() {
            return Err(Error::format(
                0,
                format!("number terminal {:?} is not a terminal", num),
            ));
        }
        Ok(Self {
            config,
            rules: IndexMap::new(),
        })
    }

    fn is_reserved(&self, sym: Symbol) -> bool {
        sym.is_end() || sym == self.config.augmented_start()
    }

    fn add(&mut self, line: usize, lhs: Symbol, alts: Vec<Vec<Symbol>>) -> Result<()> {
        if !lhs.is_valid() {
            return Err(Error::UnknownSymbol {
                symbol: lhs.as_char(),
            });
        }
        if !lhs.is_nonterminal() {
            return Err(Error::format(
                line,
                format!("left-hand side {} is not a nonterminal", lhs),
            ));
        }
        if self.is_reserved(lhs) {
            return Err(Error::format(
                line,
                format!("left-hand side {} is reserved", lhs),
            ));
        }
        let mut checked = Vec::with_capacity(alts.len());
        for alt in alts {
            checked.push(self.check_alternative(line, alt)?);
        }
        let entry = self.rules.entry(lhs).or_default();
        for alt in checked {
            if entry.contains(&alt) {
                log::warn!("line {}: dropping duplicate alternative of {}", line, lhs);
                continue;
            }
            entry.push(alt);
        }
        Ok(())
    }

    fn check_alternative(&self, line: usize, alt: Vec<Symbol>) -> Result<Vec<Symbol>> {
        if alt.is_empty() {
            return Err(Error::format(line, "empty alternative"));
        }
        if alt.contains(&Symbol::EMPTY) {
            if alt.len() != 1 {
                return Err(Error::format(
                    line,
                    "empty symbol must stand alone in an alternative",
                ));
            }
            return Ok(Vec::new());
        }
        for &sym in &alt {
            if !sym.is_valid() {
                return Err(Error::UnknownSymbol {
                    symbol: sym.as_char(),
                });
            }
            if self.is_reserved(sym) {
                return Err(Error::format(
                    line,
                    format!("reserved symbol {} on right-hand side", sym),
                ));
            }
        }
        Ok(alt)
    }

    fn finish(self) -> Result<Grammar> {
        let Some(&start) = self.rules.keys().next() else {
            return Err(Error::format(0, "grammar has no productions"));
        };
        for sym in self.rules.values().flatten().flatten() {
            if sym.is_nonterminal() && !self.rules.contains_key(sym) {
                return Err(Error::UnknownSymbol {
                    symbol: sym.as_char(),
                });
            }
        }

        let aug = self.config.augmented_start();
        let mut productions = vec![Production::new(aug, vec![start])];
        let mut alternatives: IndexMap<Symbol, Vec<ProdId>> = IndexMap::new();
        alternatives.insert(aug, vec![0]);
        let mut terminals = IndexSet::new();
        for (lhs, alts) in self.rules {
            let ids = alternatives.entry(lhs).or_default();
            for rhs in alts {
                terminals.extend(rhs.iter().copied().filter(|s| s.is_terminal()));
                ids.push(productions.len());
                productions.push(Production::new(lhs, rhs));
            }
        }
        terminals.insert(Symbol::END);

        log::debug!(
            "grammar: {} productions, {} nonterminals, {} terminals, start {}",
            productions.len(),
            alternatives.len(),
            terminals.len(),
            start
        );

        Ok(Grammar {
            config: self.config,
            productions,
            alternatives,
            terminals,
            start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(c: char) -> Symbol {
        Symbol::from_char(c).unwrap()
    }

    fn syms(s: &str) -> Vec<Symbol> {
        s.chars().map(sym).collect()
    }

    #[test]
    fn loads_and_augments() {
        let g = Grammar::parse("E -> E+T | T\nT -> T*n | n\n", Config::default()).unwrap();
        assert_eq!(g.start(), sym('E'));
        assert_eq!(g.augmented_start(), sym('Y'));
        assert_eq!(g.production(0), &Production::new(sym('Y'), vec![sym('E')]));
        assert_eq!(g.productions_of(sym('E')).unwrap(), &[1, 2]);
        assert_eq!(g.productions_of(sym('T')).unwrap(), &[3, 4]);
        assert_eq!(g.production(3).rhs(), syms("T*n").as_slice());
        assert_eq!(g.nonterminals().collect::<Vec<_>>(), syms("YET"));
        assert_eq!(g.terminals().collect::<Vec<_>>(), syms("+*n#"));
    }

    #[test]
    fn repeated_lhs_appends_alternatives() {
        let g = Grammar::parse("S -> a\nS -> b | a", Config::default()).unwrap();
        let alts: Vec<_> = g
            .productions_of(sym('S'))
            .unwrap()
            .iter()
            .map(|&p| g.production(p).rhs().to_vec())
            .collect();
        assert_eq!(alts, vec![syms("a"), syms("b")]);
    }

    #[test]
    fn epsilon_alternative() {
        let g = Grammar::parse("S -> aS | e", Config::default()).unwrap();
        let ids = g.productions_of(sym('S')).unwrap();
        assert!(g.production(ids[1]).is_empty());
        assert_eq!(g.production(ids[1]).to_string(), "S -> e");
        assert!(!g.terminals().any(|t| t == Symbol::EMPTY));
    }

    #[test]
    fn applies_substitutions() {
        let g = Grammar::parse("E -> TE'\nE' -> +TE' | e\nT -> n", Config::default()).unwrap();
        let r = sym('R');
        assert_eq!(g.productions_of(r).unwrap().len(), 2);
        assert_eq!(g.label(r), "E'");
        assert_eq!(g.label(sym('T')), "T");
    }

    #[test]
    fn format_errors() {
        let cases = [
            "E -> a -> b",
            "E a",
            "EF -> a",
            "a -> b",
            "E -> a||b",
            "E -> ae",
            "E -> a#",
            "E -> aY",
            "Y -> a",
            "",
        ];
        for src in cases {
            let err = Grammar::parse(src, Config::default()).unwrap_err();
            assert!(
                matches!(err, Error::GrammarFormat { .. }),
                "{:?} gave {:?}",
                src,
                err
            );
        }
    }

    #[test]
    fn format_error_reports_line() {
        let err = Grammar::parse("E -> n\n\nT n", Config::default()).unwrap_err();
        assert!(matches!(err, Error::GrammarFormat { line: 3, .. }));
    }

    #[test]
    fn unknown_symbols() {
        let err = Grammar::parse("E -> E+T | T", Config::default()).unwrap_err();
        assert_eq!(err, Error::UnknownSymbol { symbol: 'T' });

        let err = Grammar::parse("E -> λ", Config::default()).unwrap_err();
        assert_eq!(err, Error::UnknownSymbol { symbol: 'λ' });

        let g = Grammar::parse("E -> n", Config::default()).unwrap();
        assert_eq!(
            g.productions_of(sym('Q')).unwrap_err(),
            Error::UnknownSymbol { symbol: 'Q' }
        );
    }

    #[test]
    fn rejects_bad_config() {
        let config = Config::default().with_augmented_start(sym('z'));
        assert!(matches!(
            Grammar::parse("E -> n", config),
            Err(Error::GrammarFormat { line: 0, .. })
        ));
        let config = Config::default().with_number_terminal(sym('N'));
        assert!(matches!(
            Grammar::parse("E -> n", config),
            Err(Error::GrammarFormat { line: 0, .. })
        ));
    }

    #[test]
    fn structured_rules() {
        let g = Grammar::new(
            Config::default(),
            vec![
                (sym('S'), vec![syms("(S)"), syms("A")]),
                (sym('A'), vec![syms("a"), vec![]]),
            ],
        )
        .unwrap();
        assert_eq!(g.start(), sym('S'));
        assert_eq!(g.productions().len(), 5);
        assert!(g.production(4).is_empty());
    }

    #[test]
    fn classification_queries() {
        let g = Grammar::parse("E -> n", Config::default()).unwrap();
        assert!(g.is_nonterminal(sym('E')));
        assert!(g.is_terminal(sym('n')));
        assert!(g.is_empty(Symbol::EMPTY));
    }

    #[test]
    fn writes_productions() {
        let g = Grammar::parse("E -> E+n | e", Config::default()).unwrap();
        let mut out = Vec::new();
        g.write_prods(&mut out).unwrap();
        let text = std::string::String::from_utf8(out).unwrap();
        assert_eq!(text, "PS,3\n\nP,0,Y -> E\nP,1,E -> E + n\nP,2,E -> e\n");
    }
}
