//! # Configuration
//!
//! A [`Config`] is handed to [`Grammar`](crate::Grammar) at construction time
//! and travels with it into the automaton and the parser. It holds the label
//! substitution table used by the grammar loader, the reserved augmented
//! start symbol, and the definition of the generic *number* terminal.
//!
//! ## Example
//! ```rust
//! # use lrzero::{Config, NumberClass, Symbol};
//! let config = Config::default()
//!     .with_substitution("F'", Symbol::new(b'G'))
//!     .with_number_class(NumberClass::Alphanumeric);
//! assert_eq!(config.substitute("F'->+TF'|e"), "G->+TG|e");
//! assert!(config.is_number('x'));
//! ```

use crate::Symbol;
use indexmap::IndexMap;
use smartstring::alias::String;

/// Which input characters match the generic number terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NumberClass {
    /// Decimal digits `0`..=`9`.
    #[default]
    Digits,
    /// ASCII letters and digits (identifier-like operands).
    Alphanumeric,
}

impl NumberClass {
    #[inline]
    pub fn matches(self, c: char) -> bool {
        match self {
            NumberClass::Digits => c.is_ascii_digit(),
            NumberClass::Alphanumeric => c.is_ascii_alphanumeric(),
        }
    }
}

/// Grammar and parser configuration.
#[derive(Clone, Debug)]
pub struct Config {
    substitutions: IndexMap<String, Symbol>,
    augmented_start: Symbol,
    number_terminal: Symbol,
    number_class: NumberClass,
}

impl Default for Config {
    fn default() -> Self {
        let mut substitutions = IndexMap::new();
        substitutions.insert(String::from("E'"), Symbol::new(b'R'));
        substitutions.insert(String::from("T'"), Symbol::new(b'U'));
        Self {
            substitutions,
            augmented_start: Symbol::new(b'Y'),
            number_terminal: Symbol::new(b'n'),
            number_class: NumberClass::Digits,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a label substitution. Labels are applied in
    /// insertion order.
    pub fn with_substitution(mut self, label: impl AsRef<str>, symbol: Symbol) -> Self {
        self.substitutions.insert(String::from(label.as_ref()), symbol);
        self
    }

    /// Removes every substitution, including the defaults.
    pub fn without_substitutions(mut self) -> Self {
        self.substitutions.clear();
        self
    }

    pub fn with_augmented_start(mut self, symbol: Symbol) -> Self {
        self.augmented_start = symbol;
        self
    }

    pub fn with_number_terminal(mut self, symbol: Symbol) -> Self {
        self.number_terminal = symbol;
        self
    }

    pub fn with_number_class(mut self, class: NumberClass) -> Self {
        self.number_class = class;
        self
    }

    pub fn augmented_start(&self) -> Symbol {
        self.augmented_start
    }

    pub fn number_terminal(&self) -> Symbol {
        self.number_terminal
    }

    pub fn number_class(&self) -> NumberClass {
        self.number_class
    }

    pub fn substitutions(&self) -> impl Iterator<Item = (&str, Symbol)> {
        self.substitutions.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Rewrites every multi-character label in `text` to its symbol.
    pub fn substitute(&self, text: &str) -> String {
        let mut out = String::from(text);
        for (label, symbol) in &self.substitutions {
            if out.contains(label.as_str()) {
                let mut buf = [0u8; 4];
                out = out
                    .replace(label.as_str(), symbol.as_char().encode_utf8(&mut buf))
                    .into();
            }
        }
        out
    }

    /// Returns the label a symbol was substituted for, if any.
    pub fn label(&self, symbol: Symbol) -> Option<&str> {
        self.substitutions
            .iter()
            .find(|(_, s)| **s == symbol)
            .map(|(label, _)| label.as_str())
    }

    /// Returns `true` if `c` belongs to the number class.
    #[inline]
    pub fn is_number(&self, c: char) -> bool {
        self.number_class.matches(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.augmented_start(), Symbol::new(b'Y'));
        assert_eq!(config.number_terminal(), Symbol::new(b'n'));
        assert_eq!(config.number_class(), NumberClass::Digits);
        assert_eq!(config.substitutions().count(), 2);
    }

    #[test]
    fn substitutes_in_insertion_order() {
        let config = Config::default();
        assert_eq!(config.substitute("E->TE'"), "E->TR");
        assert_eq!(config.substitute("E'->+TE'|e"), "R->+TR|e");
        assert_eq!(config.substitute("T'->*FT'"), "U->*FU");
        assert_eq!(config.substitute("F->(E)|n"), "F->(E)|n");
    }

    #[test]
    fn reverse_label_lookup() {
        let config = Config::default();
        assert_eq!(config.label(Symbol::new(b'R')), Some("E'"));
        assert_eq!(config.label(Symbol::new(b'E')), None);
        let config = config.without_substitutions();
        assert_eq!(config.label(Symbol::new(b'R')), None);
        assert_eq!(config.substitute("E'"), "E'");
    }

    #[test]
    fn number_classes() {
        assert!(NumberClass::Digits.matches('7'));
        assert!(!NumberClass::Digits.matches('x'));
        assert!(NumberClass::Alphanumeric.matches('x'));
        assert!(NumberClass::Alphanumeric.matches('7'));
        assert!(!NumberClass::Alphanumeric.matches('+'));
    }
}
