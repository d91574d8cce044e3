//! Grammar analysis and warnings
//!
//! The matcher enforces none of its caller obligations at runtime: a
//! left-recursive rule recurses without bound and a zero-width repetition
//! body loops forever. This module is the static lint that surfaces those
//! misuses, plus a few structural mistakes, before a match is attempted.
//!
//! # Example
//!
//! ```
//! use topdown::builder::*;
//! use topdown::analysis::WarningKind;
//!
//! // expr = expr '+' x  -- left recursive
//! let grammar = GrammarBuilder::new()
//!     .rule("expr", ref_("expr").then(lit('+')).or(lit('x')))
//!     .build()
//!     .unwrap();
//!
//! let warnings = grammar.analyze_warnings();
//! assert!(warnings.iter().any(|w| w.kind == WarningKind::LeftRecursion));
//! ```

use crate::grammar::{Atom, Grammar};
use std::collections::{HashMap, HashSet};

/// Kind of grammar warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// Direct or indirect left recursion
    ///
    /// The matcher cannot handle left recursion and will recurse without
    /// bound. Example: `expr = expr "+" term | term`
    LeftRecursion,

    /// Repetition over a body that can match without consuming input
    ///
    /// `OneOrMore`/`ZeroOrMore` advance by the body's consumed length, so
    /// a zero-width body repeats at the same offset forever.
    NullableRepetition,

    /// Empty sequence or alternative
    ///
    /// An empty sequence always matches. An empty alternative never
    /// matches.
    EmptyComposite,

    /// A rule atom that references itself with no base case
    InfiniteLoop,

    /// A child index that points outside the atom arena
    DanglingIndex,

    /// An atom that is reachable from neither the root nor any named rule
    UnusedAtom,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LeftRecursion => write!(f, "left recursion"),
            Self::NullableRepetition => write!(f, "nullable repetition"),
            Self::EmptyComposite => write!(f, "empty composite"),
            Self::InfiniteLoop => write!(f, "infinite loop"),
            Self::DanglingIndex => write!(f, "dangling index"),
            Self::UnusedAtom => write!(f, "unused atom"),
        }
    }
}

/// A grammar warning
#[derive(Debug, Clone)]
pub struct GrammarWarning {
    /// The kind of warning
    pub kind: WarningKind,
    /// The atom ID where the warning was detected
    pub atom_id: usize,
    /// Human-readable message
    pub message: String,
    /// Related atom IDs (e.g., for left recursion chains)
    pub related_atoms: Vec<usize>,
}

impl GrammarWarning {
    /// Create a new warning
    pub fn new(kind: WarningKind, atom_id: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            atom_id,
            message: message.into(),
            related_atoms: Vec::new(),
        }
    }

    /// Add related atoms to the warning
    pub fn with_related(mut self, atoms: Vec<usize>) -> Self {
        self.related_atoms = atoms;
        self
    }
}

impl std::fmt::Display for GrammarWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[atom {}] {}: {}", self.atom_id, self.kind, self.message)?;
        if !self.related_atoms.is_empty() {
            write!(f, " (related atoms: {:?})", self.related_atoms)?;
        }
        Ok(())
    }
}

/// Grammar analyzer
pub struct GrammarAnalyzer<'a> {
    grammar: &'a Grammar,
    /// Cache of nullable atoms (can match without consuming input)
    nullable: HashMap<usize, bool>,
}

impl<'a> GrammarAnalyzer<'a> {
    /// Create a new analyzer for the given grammar
    pub fn new(grammar: &'a Grammar) -> Self {
        Self {
            grammar,
            nullable: HashMap::new(),
        }
    }

    /// Analyze the grammar and return all warnings
    pub fn analyze(&mut self) -> Vec<GrammarWarning> {
        let mut warnings = Vec::new();

        self.detect_dangling_indices(&mut warnings);
        self.detect_left_recursion(&mut warnings);
        self.detect_nullable_repetitions(&mut warnings);
        self.detect_empty_composites(&mut warnings);
        self.detect_infinite_loops(&mut warnings);
        self.detect_unused_atoms(&mut warnings);

        warnings
    }

    /// Detect left recursion (direct and indirect)
    ///
    /// Left recursion occurs when an atom can reach itself again at the
    /// same input offset, before anything has consumed a character.
    fn detect_left_recursion(&mut self, warnings: &mut Vec<GrammarWarning>) {
        for atom_id in 0..self.grammar.atoms.len() {
            if let Some(chain) =
                self.find_left_recursive_path(atom_id, atom_id, &mut HashSet::new())
            {
                warnings.push(
                    GrammarWarning::new(
                        WarningKind::LeftRecursion,
                        atom_id,
                        format!(
                            "Atom {} is left-recursive (can reach itself without consuming input)",
                            atom_id
                        ),
                    )
                    .with_related(chain),
                );
            }
        }
    }

    /// Find a left-recursive path from `start` back to `target`
    fn find_left_recursive_path(
        &mut self,
        start: usize,
        target: usize,
        visited: &mut HashSet<usize>,
    ) -> Option<Vec<usize>> {
        if visited.contains(&start) {
            return None;
        }
        visited.insert(start);

        let atom = self.grammar.get_atom(start)?;

        match atom {
            Atom::Rule { atom } | Atom::OneOrMore { atom } => {
                if *atom == target {
                    Some(vec![start, *atom])
                } else if !visited.contains(atom) {
                    self.find_left_recursive_path(*atom, target, visited)
                        .map(|mut path| {
                            path.insert(0, start);
                            path
                        })
                } else {
                    None
                }
            }
            Atom::Sequence { atoms } => {
                // Check children while the prefix before them is nullable
                for &child in atoms {
                    if child == target && self.all_nullable_before(atoms, child) {
                        return Some(vec![start, child]);
                    }
                    if let Some(mut path) = self.find_left_recursive_path(child, target, visited) {
                        path.insert(0, start);
                        return Some(path);
                    }
                    if !self.is_nullable(child) {
                        break;
                    }
                }
                None
            }
            Atom::Alternative { atoms } => {
                for &child in atoms {
                    if child == target {
                        return Some(vec![start, child]);
                    }
                    if let Some(mut path) = self.find_left_recursive_path(child, target, visited) {
                        path.insert(0, start);
                        return Some(path);
                    }
                }
                None
            }
            // A zero-or-more body is never mandatory at the first position
            Atom::ZeroOrMore { .. } => None,
            Atom::Start | Atom::End | Atom::Literal { .. } | Atom::Range { .. } => None,
        }
    }

    /// Check if all atoms before the target in a sequence are nullable
    fn all_nullable_before(&mut self, atoms: &[usize], target: usize) -> bool {
        for &atom in atoms {
            if atom == target {
                return true;
            }
            if !self.is_nullable(atom) {
                return false;
            }
        }
        true
    }

    /// Check if an atom is nullable (can match without consuming input)
    fn is_nullable(&mut self, atom_id: usize) -> bool {
        if let Some(&result) = self.nullable.get(&atom_id) {
            return result;
        }

        // In-progress atoms read as non-nullable, so recursive rules
        // reach a fixpoint instead of recursing forever
        self.nullable.insert(atom_id, false);
        let result = self.compute_nullable(atom_id);
        self.nullable.insert(atom_id, result);
        result
    }

    /// Compute whether an atom is nullable
    fn compute_nullable(&mut self, atom_id: usize) -> bool {
        let Some(atom) = self.grammar.get_atom(atom_id) else {
            return false;
        };

        match atom {
            Atom::Start | Atom::End => true,
            Atom::Literal { .. } | Atom::Range { .. } => false,
            Atom::ZeroOrMore { .. } => true,
            Atom::OneOrMore { atom } | Atom::Rule { atom } => self.is_nullable(*atom),
            Atom::Sequence { atoms } => atoms.iter().all(|&a| self.is_nullable(a)),
            Atom::Alternative { atoms } => atoms.iter().any(|&a| self.is_nullable(a)),
        }
    }

    /// Detect repetitions whose body can match without consuming input
    fn detect_nullable_repetitions(&mut self, warnings: &mut Vec<GrammarWarning>) {
        for atom_id in 0..self.grammar.atoms.len() {
            let body = match self.grammar.get_atom(atom_id) {
                Some(Atom::OneOrMore { atom }) | Some(Atom::ZeroOrMore { atom }) => *atom,
                _ => continue,
            };
            if self.is_nullable(body) {
                warnings.push(
                    GrammarWarning::new(
                        WarningKind::NullableRepetition,
                        atom_id,
                        "Repetition body can match without consuming input; matching it never terminates",
                    )
                    .with_related(vec![body]),
                );
            }
        }
    }

    /// Detect empty sequences and alternatives
    fn detect_empty_composites(&self, warnings: &mut Vec<GrammarWarning>) {
        for (atom_id, atom) in self.grammar.atoms.iter().enumerate() {
            match atom {
                Atom::Sequence { atoms } if atoms.is_empty() => {
                    warnings.push(GrammarWarning::new(
                        WarningKind::EmptyComposite,
                        atom_id,
                        "Empty sequence always matches (consuming nothing)",
                    ));
                }
                Atom::Alternative { atoms } if atoms.is_empty() => {
                    warnings.push(GrammarWarning::new(
                        WarningKind::EmptyComposite,
                        atom_id,
                        "Empty alternative never matches",
                    ));
                }
                _ => {}
            }
        }
    }

    /// Detect rule atoms that only reference themselves
    fn detect_infinite_loops(&self, warnings: &mut Vec<GrammarWarning>) {
        for (atom_id, atom) in self.grammar.atoms.iter().enumerate() {
            if let Atom::Rule { atom } = atom {
                if *atom == atom_id {
                    warnings.push(GrammarWarning::new(
                        WarningKind::InfiniteLoop,
                        atom_id,
                        format!(
                            "Atom {} is a rule that references itself with no base case",
                            atom_id
                        ),
                    ));
                }
            }
        }
    }

    /// Detect child indices that point outside the arena
    fn detect_dangling_indices(&self, warnings: &mut Vec<GrammarWarning>) {
        let count = self.grammar.atoms.len();
        for (atom_id, atom) in self.grammar.atoms.iter().enumerate() {
            let check = |child: usize, warnings: &mut Vec<GrammarWarning>| {
                if child >= count {
                    warnings.push(
                        GrammarWarning::new(
                            WarningKind::DanglingIndex,
                            atom_id,
                            format!("Child index {} points outside the atom arena", child),
                        )
                        .with_related(vec![child]),
                    );
                }
            };
            match atom {
                Atom::OneOrMore { atom }
                | Atom::ZeroOrMore { atom }
                | Atom::Rule { atom } => check(*atom, warnings),
                Atom::Sequence { atoms } | Atom::Alternative { atoms } => {
                    for &child in atoms {
                        check(child, warnings);
                    }
                }
                Atom::Start | Atom::End | Atom::Literal { .. } | Atom::Range { .. } => {}
            }
        }
    }

    /// Detect atoms reachable from neither the root nor any named rule
    fn detect_unused_atoms(&self, warnings: &mut Vec<GrammarWarning>) {
        let mut reachable = HashSet::new();
        self.collect_reachable(self.grammar.root, &mut reachable);
        for &idx in self.grammar.rules.values() {
            self.collect_reachable(idx, &mut reachable);
        }

        for atom_id in 0..self.grammar.atoms.len() {
            if !reachable.contains(&atom_id) {
                warnings.push(GrammarWarning::new(
                    WarningKind::UnusedAtom,
                    atom_id,
                    format!(
                        "Atom {} is reachable from neither the root nor any named rule",
                        atom_id
                    ),
                ));
            }
        }
    }

    /// Collect all atoms reachable from the given atom
    fn collect_reachable(&self, atom_id: usize, reachable: &mut HashSet<usize>) {
        if reachable.contains(&atom_id) {
            return;
        }
        reachable.insert(atom_id);

        let Some(atom) = self.grammar.get_atom(atom_id) else {
            return;
        };

        match atom {
            Atom::Start | Atom::End | Atom::Literal { .. } | Atom::Range { .. } => {}
            Atom::Sequence { atoms } | Atom::Alternative { atoms } => {
                for &child in atoms {
                    self.collect_reachable(child, reachable);
                }
            }
            Atom::OneOrMore { atom } | Atom::ZeroOrMore { atom } | Atom::Rule { atom } => {
                self.collect_reachable(*atom, reachable);
            }
        }
    }
}
