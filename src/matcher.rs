//! The topdown matching engine
//!
//! This module implements the recursive-descent matcher. A [`Matcher`]
//! borrows a grammar and an input string and answers one question per
//! call: does the atom match at this byte offset, and if so, how many
//! bytes does it consume? There is no parse tree and no failure detail;
//! the only failure shape is `None`.

use crate::grammar::{Atom, Grammar};

/// Logging macros - no-op when logging feature is disabled
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Logging macros - use log crate when logging feature is enabled
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

/// The matching engine
///
/// Stateless and side-effect-free: every method takes `&self` and the
/// same call always returns the same outcome. Offsets are byte offsets
/// into the UTF-8 input; consumed lengths are byte counts, so `Literal`
/// and `Range` consume the UTF-8 width of the character they match.
///
/// Matching is a pure, terminating computation for any grammar that
/// honors the caller obligations: no left-recursive rules and no
/// zero-width atom directly under `OneOrMore`/`ZeroOrMore`. The matcher
/// does not check these at runtime (violations recurse or loop without
/// bound); [`crate::analysis::GrammarAnalyzer`] flags them statically.
pub struct Matcher<'a> {
    /// The grammar being matched
    grammar: &'a Grammar,

    /// Input string (UTF-8)
    input: &'a str,
}

impl<'a> Matcher<'a> {
    /// Create a matcher over `input` for the given grammar
    #[inline]
    pub fn new(grammar: &'a Grammar, input: &'a str) -> Self {
        Self { grammar, input }
    }

    /// The input this matcher reads
    #[inline]
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Match the grammar's root atom at `pos`
    ///
    /// Returns the number of bytes consumed on success.
    pub fn match_at(&self, pos: usize) -> Option<usize> {
        log_debug!("match root atom {} at {}", self.grammar.root, pos);
        self.match_atom(self.grammar.root, pos)
    }

    /// Match a single atom at `pos`
    ///
    /// A dangling atom index is a guaranteed non-match, never a panic.
    /// On `Some(consumed)`, `pos + consumed <= input.len()` holds.
    pub fn match_atom(&self, atom_id: usize, pos: usize) -> Option<usize> {
        match self.grammar.get_atom(atom_id)? {
            Atom::Start => {
                if pos == 0 {
                    Some(0)
                } else {
                    None
                }
            }
            Atom::End => {
                if pos >= self.input.len() {
                    Some(0)
                } else {
                    None
                }
            }
            Atom::Literal { ch } => self.match_literal(*ch, pos),
            Atom::Range { lo, hi } => self.match_range(*lo, *hi, pos),
            Atom::OneOrMore { atom } => self.match_one_or_more(*atom, pos),
            Atom::ZeroOrMore { atom } => self.match_zero_or_more(*atom, pos),
            Atom::Sequence { atoms } => self.match_sequence(atoms, pos),
            Atom::Alternative { atoms } => self.match_alternative(atoms, pos),
            Atom::Rule { atom } => {
                log_debug!("enter rule body {} at {}", atom, pos);
                self.match_atom(*atom, pos)
            }
        }
    }

    /// Decode the character at `pos`
    ///
    /// Offsets at or past end-of-input, and offsets that fall inside a
    /// multi-byte character, yield `None`.
    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        self.input.get(pos..).and_then(|tail| tail.chars().next())
    }

    /// Match a single literal character
    #[inline]
    fn match_literal(&self, ch: char, pos: usize) -> Option<usize> {
        let c = self.char_at(pos)?;
        if c == ch {
            Some(c.len_utf8())
        } else {
            None
        }
    }

    /// Match a single character in an inclusive range
    #[inline]
    fn match_range(&self, lo: char, hi: char, pos: usize) -> Option<usize> {
        let c = self.char_at(pos)?;
        if (lo..=hi).contains(&c) {
            Some(c.len_utf8())
        } else {
            None
        }
    }

    /// Greedily match `atom_id` one or more times, summing consumed bytes
    ///
    /// Fails iff the first iteration fails.
    #[inline]
    fn match_one_or_more(&self, atom_id: usize, pos: usize) -> Option<usize> {
        let mut consumed = self.match_atom(atom_id, pos)?;
        while let Some(n) = self.match_atom(atom_id, pos + consumed) {
            consumed += n;
        }
        Some(consumed)
    }

    /// Greedily match `atom_id` zero or more times, summing consumed bytes
    ///
    /// Never fails; an immediate non-match consumes 0 bytes.
    #[inline]
    fn match_zero_or_more(&self, atom_id: usize, pos: usize) -> Option<usize> {
        let mut consumed = 0;
        while let Some(n) = self.match_atom(atom_id, pos + consumed) {
            consumed += n;
        }
        Some(consumed)
    }

    /// Match a sequence of atoms left to right
    ///
    /// Short-circuits on the first failing child; partial consumption is
    /// discarded, never reported.
    #[inline]
    fn match_sequence(&self, atoms: &[usize], pos: usize) -> Option<usize> {
        let mut consumed = 0;
        for &atom_id in atoms {
            consumed += self.match_atom(atom_id, pos + consumed)?;
        }
        Some(consumed)
    }

    /// Match alternatives in order, returning the first success unchanged
    ///
    /// No backtracking into later alternatives once one succeeds, even if
    /// a later one would consume more. Fails only when every alternative
    /// fails; an empty alternative list never matches.
    #[inline]
    fn match_alternative(&self, atoms: &[usize], pos: usize) -> Option<usize> {
        for &atom_id in atoms {
            if let Some(consumed) = self.match_atom(atom_id, pos) {
                return Some(consumed);
            }
        }
        None
    }
}
