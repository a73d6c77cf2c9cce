//! # Grammar symbols
//!
//! Every grammar symbol is a single printable ASCII character. Its class is
//! decided by the character alone:
//!
//! - uppercase letters (`A`..=`Z`) are **nonterminals**,
//! - `e` is the **empty** symbol, used to spell epsilon alternatives,
//! - every other printable character is a **terminal**, including the
//!   end-of-input marker `#`.
//!
//! The three predicates are total, mutually exclusive and exhaustive, so no
//! symbol ever needs to carry a mutable tag.

use std::fmt;

/// A single terminal, nonterminal or empty symbol.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u8);

impl Symbol {
    /// The empty symbol. Only ever appears alone on a right-hand side.
    pub const EMPTY: Symbol = Symbol(b'e');

    /// End-of-input marker, also used as the bottom-of-stack sentinel.
    pub const END: Symbol = Symbol(b'#');

    /// Creates a symbol from a raw byte without validating it.
    #[inline]
    pub const fn new(byte: u8) -> Self {
        Symbol(byte)
    }

    /// Creates a symbol from a character, or `None` if the character is not
    /// printable ASCII.
    #[inline]
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_graphic() {
            Some(Symbol(c as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn as_char(self) -> char {
        self.0 as char
    }

    /// Returns `true` if the underlying byte is printable ASCII.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0.is_ascii_graphic()
    }

    #[inline]
    pub fn is_nonterminal(self) -> bool {
        self.0.is_ascii_uppercase()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        !(self.is_nonterminal() || self.is_empty())
    }

    #[inline]
    pub fn is_end(self) -> bool {
        self == Self::END
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_char())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Symbol {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Symbol::from_char(c).ok_or(c)
    }
}

#[cfg(test)]
mod tests {
    use super::Symbol;

    #[test]
    fn classes_are_exclusive_and_exhaustive() {
        for b in 0x21u8..0x7f {
            let s = Symbol::new(b);
            let hits = [s.is_terminal(), s.is_nonterminal(), s.is_empty()]
                .iter()
                .filter(|x| **x)
                .count();
            assert_eq!(hits, 1, "symbol {:?}", s);
        }
    }

    #[test]
    fn classification_by_character() {
        assert!(Symbol::new(b'E').is_nonterminal());
        assert!(Symbol::new(b'n').is_terminal());
        assert!(Symbol::new(b'+').is_terminal());
        assert!(Symbol::END.is_terminal());
        assert!(Symbol::EMPTY.is_empty());
        assert!(!Symbol::EMPTY.is_terminal());
    }

    #[test]
    fn rejects_non_printable_characters() {
        assert_eq!(Symbol::from_char(' '), None);
        assert_eq!(Symbol::from_char('\n'), None);
        assert_eq!(Symbol::from_char('é'), None);
        assert_eq!(Symbol::try_from('λ'), Err('λ'));
        assert_eq!(Symbol::from_char('('), Some(Symbol::new(b'(')));
    }

    #[test]
    fn displays_as_character() {
        assert_eq!(Symbol::new(b'T').to_string(), "T");
        assert_eq!(format!("{:?}", Symbol::END), "'#'");
    }
}
