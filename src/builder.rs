//! Grammar builder and combinator DSL
//!
//! This module provides a fluent, composable API for defining grammars,
//! and doubles as the rule registry: every named rule maps to exactly one
//! arena slot, shared by every reference to it, and a rule body may
//! mention rules that are registered later (forward and mutual
//! recursion). References are resolved by name when [`GrammarBuilder::build`]
//! runs, not when the reference is written down.
//!
//! # Example
//!
//! ```
//! use topdown::builder::*;
//!
//! let grammar = GrammarBuilder::new()
//!     .rule("number", range('0', '9').many1())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(grammar.match_len("42x"), Some(2));
//! ```

use crate::grammar::{Atom, Grammar};
use std::collections::HashMap;
use std::fmt;

/// Clause trait - implemented by all grammar combinators
pub trait Clause: Send + Sync {
    /// Build this clause into the grammar arena, returning its atom index
    fn build(self, builder: &mut GrammarBuilder) -> usize;
}

/// Error raised while building a grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A rule reference never got a matching rule definition
    UnresolvedRule {
        /// The name that was referenced but never registered
        name: String,
    },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::UnresolvedRule { name } => {
                write!(f, "unresolved rule reference: {}", name)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// Grammar builder for constructing grammars
///
/// The builder is the grammar registry: atoms live in a flat arena, named
/// rules map to arena indices, and structurally identical atoms are
/// interned so that two constructions of the same specialization (say,
/// `lit('a')` used in five rules) share a single slot.
pub struct GrammarBuilder {
    /// All atoms in the grammar
    atoms: Vec<Atom>,

    /// Interner: one arena slot per distinct atom specialization
    interned: hashbrown::HashMap<Atom, usize>,

    /// Named rules and their atom indices
    rules: HashMap<String, usize>,

    /// Rule atoms awaiting resolution, by arena index
    pending_rules: HashMap<usize, String>,

    /// Track insertion order for rules (first rule = root)
    first_rule: Option<String>,
}

impl GrammarBuilder {
    /// Create a new grammar builder
    pub fn new() -> Self {
        Self {
            atoms: Vec::new(),
            interned: hashbrown::HashMap::new(),
            rules: HashMap::new(),
            pending_rules: HashMap::new(),
            first_rule: None,
        }
    }

    /// Add a rule to the grammar
    ///
    /// The first rule registered becomes the grammar's root. Registering
    /// a name twice rebinds it; references resolve to the latest binding.
    pub fn rule(mut self, name: &str, clause: impl Clause) -> Self {
        let atom_idx = clause.build(&mut self);
        self.rules.insert(name.to_string(), atom_idx);
        if self.first_rule.is_none() {
            self.first_rule = Some(name.to_string());
        }
        self
    }

    /// Add an atom and return its index
    ///
    /// Non-`Rule` atoms are interned: adding a specialization that
    /// already exists returns the existing slot. `Rule` atoms always get
    /// a fresh slot because their targets are patched at build time.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        if matches!(atom, Atom::Rule { .. }) {
            let idx = self.atoms.len();
            self.atoms.push(atom);
            return idx;
        }
        if let Some(&idx) = self.interned.get(&atom) {
            return idx;
        }
        let idx = self.atoms.len();
        self.interned.insert(atom.clone(), idx);
        self.atoms.push(atom);
        idx
    }

    /// Register a rule reference to be resolved at build time
    pub fn add_pending_rule(&mut self, atom_idx: usize, rule_name: String) {
        self.pending_rules.insert(atom_idx, rule_name);
    }

    /// Get the current number of atoms
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Get a reference to an atom by index
    pub fn get_atom(&self, idx: usize) -> Option<&Atom> {
        self.atoms.get(idx)
    }

    /// Build the final grammar
    ///
    /// Resolves every pending rule reference through the rule map; a name
    /// that was referenced but never registered is an error. The first
    /// registered rule becomes the root.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let mut atoms = self.atoms;
        for (idx, rule_name) in self.pending_rules {
            let Some(&target) = self.rules.get(&rule_name) else {
                return Err(GrammarError::UnresolvedRule { name: rule_name });
            };
            if let Some(Atom::Rule { atom }) = atoms.get_mut(idx) {
                *atom = target;
            }
        }

        let root = self
            .first_rule
            .and_then(|name| self.rules.get(&name).copied())
            .unwrap_or(0);

        Ok(Grammar {
            atoms,
            root,
            rules: self.rules,
        })
    }
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Combinators - Fundamental Building Blocks
// ============================================================================

/// Match only at the start of input (zero-width anchor)
#[derive(Clone, Copy)]
pub struct Start;

impl Clause for Start {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        builder.add_atom(Atom::Start)
    }
}

/// Match only at the end of input (zero-width anchor)
#[derive(Clone, Copy)]
pub struct End;

impl Clause for End {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        builder.add_atom(Atom::End)
    }
}

/// Match a single literal character
#[derive(Clone, Copy)]
pub struct Lit(pub char);

impl Clause for Lit {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        builder.add_atom(Atom::Literal { ch: self.0 })
    }
}

/// Match a single character in an inclusive range
#[derive(Clone, Copy)]
pub struct CharRange {
    /// Lower bound (inclusive)
    pub lo: char,
    /// Upper bound (inclusive)
    pub hi: char,
}

impl Clause for CharRange {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        builder.add_atom(Atom::Range {
            lo: self.lo,
            hi: self.hi,
        })
    }
}

/// A reference to a named rule (for recursive grammars)
#[derive(Clone, Copy)]
pub struct Ref<'a>(pub &'a str);

impl<'a> Clause for Ref<'a> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        // Placeholder target, patched when the grammar is built
        let atom_idx = builder.add_atom(Atom::Rule { atom: usize::MAX });
        builder.add_pending_rule(atom_idx, self.0.to_string());
        atom_idx
    }
}

/// Sequence of two clauses (A then B)
#[derive(Clone, Copy)]
pub struct Then<A, B> {
    first: A,
    second: B,
}

impl<A: Clause, B: Clause> Clause for Then<A, B> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let atoms = vec![self.first.build(builder), self.second.build(builder)];
        builder.add_atom(Atom::Sequence { atoms })
    }
}

/// Ordered choice of two clauses (A, else B)
#[derive(Clone, Copy)]
pub struct OrElse<A, B> {
    first: A,
    second: B,
}

impl<A: Clause, B: Clause> Clause for OrElse<A, B> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let atoms = vec![self.first.build(builder), self.second.build(builder)];
        builder.add_atom(Atom::Alternative { atoms })
    }
}

/// Zero-or-more repetition of a clause
#[derive(Clone, Copy)]
pub struct Many<C> {
    inner: C,
}

impl<C: Clause> Clause for Many<C> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let inner_idx = self.inner.build(builder);
        builder.add_atom(Atom::ZeroOrMore { atom: inner_idx })
    }
}

/// One-or-more repetition of a clause
#[derive(Clone, Copy)]
pub struct Many1<C> {
    inner: C,
}

impl<C: Clause> Clause for Many1<C> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let inner_idx = self.inner.build(builder);
        builder.add_atom(Atom::OneOrMore { atom: inner_idx })
    }
}

/// A sequence of multiple clauses
pub struct Sequence<C>(pub Vec<C>);

impl<C: Clause> Clause for Sequence<C> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let atoms: Vec<usize> = self.0.into_iter().map(|c| c.build(builder)).collect();
        builder.add_atom(Atom::Sequence { atoms })
    }
}

/// An ordered choice of multiple clauses
pub struct Choice<C>(pub Vec<C>);

impl<C: Clause> Clause for Choice<C> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let atoms: Vec<usize> = self.0.into_iter().map(|c| c.build(builder)).collect();
        builder.add_atom(Atom::Alternative { atoms })
    }
}

/// A type-erased clause (for heterogeneous sequences/choices)
pub struct Dyn(Box<dyn DynClause>);

/// Trait for type-erased clauses
pub trait DynClause: Send + Sync {
    /// Build this clause into the grammar arena
    fn build_boxed(self: Box<Self>, builder: &mut GrammarBuilder) -> usize;
}

impl<C: Clause + 'static> DynClause for C {
    fn build_boxed(self: Box<Self>, builder: &mut GrammarBuilder) -> usize {
        (*self).build(builder)
    }
}

impl Clause for Dyn {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        self.0.build_boxed(builder)
    }
}

// ============================================================================
// Extension trait for Clause
// ============================================================================

/// Extension trait for Clause with combinator methods
pub trait ClauseExt: Clause + Sized {
    /// Sequence: this, then `other`
    fn then<B: Clause>(self, other: B) -> Then<Self, B> {
        Then {
            first: self,
            second: other,
        }
    }

    /// Ordered choice: this, else `other`
    fn or<B: Clause>(self, other: B) -> OrElse<Self, B> {
        OrElse {
            first: self,
            second: other,
        }
    }

    /// Match zero or more times
    fn many(self) -> Many<Self> {
        Many { inner: self }
    }

    /// Match one or more times
    fn many1(self) -> Many1<Self> {
        Many1 { inner: self }
    }
}

impl<C: Clause> ClauseExt for C {}

// ============================================================================
// Free constructors
// ============================================================================

/// Match only at the start of input
pub fn start() -> Start {
    Start
}

/// Match only at the end of input
pub fn end() -> End {
    End
}

/// Match a single literal character
pub fn lit(ch: char) -> Lit {
    Lit(ch)
}

/// Match a single character in the inclusive range `[lo, hi]`
pub fn range(lo: char, hi: char) -> CharRange {
    CharRange { lo, hi }
}

/// Reference a named rule (which may be registered later)
pub fn ref_(name: &str) -> Ref<'_> {
    Ref(name)
}

/// Match a sequence of clauses
pub fn seq<I, C>(items: I) -> Sequence<C>
where
    I: IntoIterator<Item = C>,
    C: Clause,
{
    Sequence(items.into_iter().collect())
}

/// Match the first of several clauses that succeeds
pub fn choice<I, C>(items: I) -> Choice<C>
where
    I: IntoIterator<Item = C>,
    C: Clause,
{
    Choice(items.into_iter().collect())
}

/// Convert any clause to a type-erased one
pub fn dynamic<C: Clause + 'static>(c: C) -> Dyn {
    Dyn(Box::new(c))
}
