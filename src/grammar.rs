//! Grammar types for topdown
//!
//! This module defines the in-memory representation of grammars. A grammar
//! is a flat arena of atoms referencing each other by index, which lets
//! mutually recursive rules point at one another without owned cycles.

use crate::analysis::{GrammarAnalyzer, GrammarWarning};
use crate::matcher::Matcher;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Atom types that make up a grammar
///
/// Composite atoms hold indices into the grammar's atom arena rather than
/// owned children. Atoms are immutable once the grammar is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Atom {
    /// Match only at the start of input, consuming nothing
    Start,

    /// Match only at (or past) the end of input, consuming nothing
    End,

    /// Match a single literal character
    Literal {
        /// The character to match
        ch: char,
    },

    /// Match a single character in an inclusive range
    Range {
        /// Lower bound (inclusive)
        lo: char,
        /// Upper bound (inclusive)
        hi: char,
    },

    /// Greedily match an atom one or more times
    OneOrMore {
        /// Index into the atom arena
        atom: usize,
    },

    /// Greedily match an atom zero or more times (never fails)
    ZeroOrMore {
        /// Index into the atom arena
        atom: usize,
    },

    /// Match multiple atoms left to right, each starting where the
    /// previous one ended
    Sequence {
        /// Indices into the atom arena
        atoms: Vec<usize>,
    },

    /// Try alternatives in order, committing to the first that matches
    Alternative {
        /// Indices into the atom arena
        atoms: Vec<usize>,
    },

    /// Indirection through a named rule
    ///
    /// Rule atoms are what make forward and mutual references possible:
    /// `GrammarBuilder` creates them as placeholders and patches the
    /// target index when the grammar is built.
    Rule {
        /// Index of the rule body in the atom arena
        atom: usize,
    },
}

/// A complete grammar
///
/// Contains the atom arena, the root atom index, and the name → index map
/// for named rules. Immutable after construction and `Send + Sync`, so a
/// grammar built once (e.g. inside a `std::sync::OnceLock`) can be shared
/// by any number of concurrent matches for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    /// All atoms in the grammar (referenced by index)
    pub atoms: Vec<Atom>,

    /// Index of the root atom
    pub root: usize,

    /// Named rules and their atom indices
    pub rules: HashMap<String, usize>,
}

impl Grammar {
    /// Create a new empty grammar
    #[inline]
    pub fn new() -> Self {
        Self {
            atoms: Vec::new(),
            root: 0,
            rules: HashMap::new(),
        }
    }

    /// Add an atom and return its index
    #[inline]
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        idx
    }

    /// Get an atom by index
    #[inline]
    pub fn get_atom(&self, idx: usize) -> Option<&Atom> {
        self.atoms.get(idx)
    }

    /// Get the root atom
    #[inline]
    pub fn root_atom(&self) -> Option<&Atom> {
        self.atoms.get(self.root)
    }

    /// Get total atom count
    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Look up a named rule's atom index
    #[inline]
    pub fn rule(&self, name: &str) -> Option<usize> {
        self.rules.get(name).copied()
    }

    /// Serialize to JSON
    #[inline]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON
    #[inline]
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Match the root rule against `input` at offset 0
    ///
    /// Returns the number of bytes consumed on success, or `None` if the
    /// input does not match. This is the one-shot entry point; use
    /// [`Matcher`] directly to match at other offsets.
    ///
    /// # Example
    ///
    /// ```
    /// use topdown::builder::{lit, GrammarBuilder, ClauseExt};
    ///
    /// let grammar = GrammarBuilder::new()
    ///     .rule("ab", lit('a').then(lit('b')))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(grammar.match_len("abc"), Some(2));
    /// assert_eq!(grammar.match_len("ba"), None);
    /// ```
    pub fn match_len(&self, input: &str) -> Option<usize> {
        Matcher::new(self, input).match_at(0)
    }

    /// Match a named rule against `input` at offset 0
    ///
    /// Resolves `name` through the rule map and runs its body. Returns
    /// `None` both when the rule does not exist and when the input does
    /// not match; callers that need to tell these apart can check
    /// [`rule`](Self::rule) first.
    pub fn match_rule(&self, name: &str, input: &str) -> Option<usize> {
        let idx = self.rule(name)?;
        Matcher::new(self, input).match_atom(idx, 0)
    }

    /// Analyze the grammar for potential issues and return warnings
    ///
    /// The matcher performs no runtime checks for left recursion or
    /// zero-width repetition bodies; this is the static lint that makes
    /// those misuses visible before a match is attempted.
    ///
    /// # Example
    ///
    /// ```
    /// use topdown::grammar::{Atom, Grammar};
    ///
    /// let mut grammar = Grammar::new();
    /// let digit = grammar.add_atom(Atom::Range { lo: '0', hi: '9' });
    /// grammar.root = grammar.add_atom(Atom::OneOrMore { atom: digit });
    ///
    /// assert!(grammar.analyze_warnings().is_empty());
    /// ```
    pub fn analyze_warnings(&self) -> Vec<GrammarWarning> {
        GrammarAnalyzer::new(self).analyze()
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_new() {
        let grammar = Grammar::new();
        assert_eq!(grammar.atom_count(), 0);
        assert!(grammar.root_atom().is_none());
    }

    #[test]
    fn test_grammar_add_atom() {
        let mut grammar = Grammar::new();

        let idx = grammar.add_atom(Atom::Literal { ch: 'a' });

        assert_eq!(idx, 0);
        assert_eq!(grammar.atom_count(), 1);

        match grammar.get_atom(0).unwrap() {
            Atom::Literal { ch } => assert_eq!(*ch, 'a'),
            _ => panic!("Wrong atom type"),
        }
    }

    #[test]
    fn test_grammar_json_roundtrip() {
        let mut grammar = Grammar::new();

        let digit = grammar.add_atom(Atom::Range { lo: '0', hi: '9' });
        let number = grammar.add_atom(Atom::OneOrMore { atom: digit });
        grammar.root = number;
        grammar.rules.insert("number".to_string(), number);

        let json = grammar.to_json().unwrap();
        let parsed = Grammar::from_json(&json).unwrap();

        assert_eq!(parsed, grammar);
        assert_eq!(parsed.rule("number"), Some(number));
    }

    #[test]
    fn test_match_len_on_hand_built_grammar() {
        let mut grammar = Grammar::new();
        let digit = grammar.add_atom(Atom::Range { lo: '0', hi: '9' });
        grammar.root = grammar.add_atom(Atom::OneOrMore { atom: digit });

        assert_eq!(grammar.match_len("123abc"), Some(3));
        assert_eq!(grammar.match_len("abc"), None);
    }

    #[test]
    fn test_match_rule_unknown_name() {
        let grammar = Grammar::new();
        assert_eq!(grammar.match_rule("missing", "abc"), None);
    }
}
