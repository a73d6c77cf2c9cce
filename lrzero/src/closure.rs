//! # Closure and goto
//!
//! [`closure`] expands an item set with every zero-dot item reachable through
//! nonterminals at a dot; [`goto`] moves the dot over one symbol and closes
//! the result. Both work on [`ItemSet`]s whose structural hashing makes
//! membership checks constant time.

use crate::{Grammar, Item, ItemSet, Symbol};
use std::collections::HashSet;

/// Computes the closure of `kernel`.
///
/// The set is scanned by index while it grows, so items added during the
/// scan are examined too. Each nonterminal found at a dot is expanded once,
/// adding `N -> .alpha` (origin `N`) for every alternative of `N`. The
/// result keeps the kernel items first, followed by the expansion in
/// discovery order.
///
/// # Example
/// ```text
/// closure({ Y -> .E })  with  E -> E+T | T,  T -> n
///   = { Y -> .E,  E -> .E+T,  E -> .T,  T -> .n }
/// ```
pub fn closure(kernel: &ItemSet, grammar: &Grammar) -> ItemSet {
    let mut items = kernel.clone();
    let mut expanded: HashSet<Symbol> = HashSet::new();
    let mut i = 0;
    while i < items.len() {
        let item = items[i];
        i += 1;
        let Some(next) = item.symbol_at_dot(grammar) else {
            continue;
        };
        if !next.is_nonterminal() || !expanded.insert(next) {
            continue;
        }
        // Every right-hand-side nonterminal is defined; checked at load time.
        let alternatives = grammar.productions_of(next).unwrap_or(&[]);
        for &prod in alternatives {
            items.insert(Item::new(prod, 0, next));
        }
    }
    log::trace!(
        "closure: {} kernel items -> {} items",
        kernel.len(),
        items.len()
    );
    items
}

/// Computes the item set reached from `items` over `symbol`.
///
/// An empty result means there is no transition on `symbol`.
pub fn goto(items: &ItemSet, symbol: Symbol, grammar: &Grammar) -> ItemSet {
    let moved: ItemSet = items
        .iter()
        .filter(|item| item.symbol_at_dot(grammar) == Some(symbol))
        .map(Item::advance)
        .collect();
    if moved.is_empty() {
        return moved;
    }
    closure(&moved, grammar)
}
