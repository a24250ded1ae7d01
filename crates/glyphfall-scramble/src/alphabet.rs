#![forbid(unsafe_code)]

//! Decorative symbol alphabet and separator classification.

use glyphfall_core::SymbolSource;

use crate::error::ScrambleError;

/// Punctuation plus uppercase letters. Repeated symbols are drawn more often,
/// so the run of underscores gives the scramble its low, dashed texture.
pub const DEFAULT_SYMBOLS: &str = "!<>-_\\/[]{}—=+*^?#________ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Whether `c` separates words. Only the plain space does; tabs, newlines
/// and other whitespace scramble like any other character.
#[inline]
pub fn is_separator(c: char) -> bool {
    c == ' '
}

/// The symbols unresolved positions are drawn from, uniformly by slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from the characters of `symbols`, keeping repeats.
    ///
    /// # Errors
    ///
    /// [`ScrambleError::EmptyAlphabet`] if `symbols` has no characters.
    pub fn new(symbols: &str) -> Result<Self, ScrambleError> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty() {
            return Err(ScrambleError::EmptyAlphabet);
        }
        Ok(Self { symbols })
    }

    /// The symbol slots, in order.
    #[inline]
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Number of slots (repeats counted).
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; an alphabet cannot be built empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether `c` is one of the symbols.
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.symbols.contains(&c)
    }

    /// Draw one symbol uniformly by slot.
    #[inline]
    pub fn draw(&self, rng: &mut dyn SymbolSource) -> char {
        self.symbols[rng.next_index(self.symbols.len())]
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.chars().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphfall_core::XorShift64;

    #[test]
    fn default_alphabet_shape() {
        let a = Alphabet::default();
        assert_eq!(a.len(), 52);
        assert!(a.contains('#'));
        assert!(a.contains('Z'));
        assert!(!a.contains('a'));
        assert!(!a.contains(' '));
    }

    #[test]
    fn default_alphabet_has_no_separators() {
        assert!(Alphabet::default().symbols().iter().all(|c| !is_separator(*c)));
    }

    #[test]
    fn empty_alphabet_rejected() {
        assert_eq!(Alphabet::new(""), Err(ScrambleError::EmptyAlphabet));
    }

    #[test]
    fn draws_come_from_alphabet() {
        let a = Alphabet::new("XY").unwrap();
        let mut rng = XorShift64::new(3);
        for _ in 0..100 {
            let c = a.draw(&mut rng);
            assert!(c == 'X' || c == 'Y');
        }
    }

    #[test]
    fn only_the_space_separates() {
        assert!(is_separator(' '));
        assert!(!is_separator('\n'));
        assert!(!is_separator('\t'));
        assert!(!is_separator('\u{a0}'));
        assert!(!is_separator('_'));
        assert!(!is_separator('A'));
    }
}
