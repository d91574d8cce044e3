//! Topdown - Recursive-Descent PEG Matching Engine
//!
//! A small algebra of grammar atoms (anchors, literal and range matchers,
//! repetition, sequencing, ordered choice) that can be composed into a
//! grammar and matched against a text with PEG-style backtracking. The
//! engine answers exactly one question: how many bytes does the grammar
//! consume at a given offset? It builds no parse trees and explains no
//! failures.
//!
//! Grammars are flat arenas of atoms referencing each other by index, so
//! mutually recursive rules can point at one another without owned
//! cycles, and a built grammar is an immutable `Send + Sync` value that
//! can be shared by any number of concurrent matches.
//!
//! ## Quick Start
//!
//! ```rust
//! use topdown::builder::*;
//!
//! let grammar = GrammarBuilder::new()
//!     .rule("number", range('0', '9').many1())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(grammar.match_len("123abc"), Some(3));
//! assert_eq!(grammar.match_len("abc"), None);
//! ```
//!
//! ## Recursive rules
//!
//! Rules reference each other by name, in any order; references are
//! resolved when the grammar is built.
//!
//! ```rust
//! use topdown::builder::*;
//!
//! let grammar = GrammarBuilder::new()
//!     .rule("list", lit('[').then(ref_("items")).then(lit(']')))
//!     .rule("items", ref_("item").many())
//!     .rule("item", range('a', 'z').or(ref_("list")))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(grammar.match_len("[a[bc]d]"), Some(8));
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` - Enable debug logging using the `log` crate

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]

// Prelude module for convenient imports
pub mod prelude;

pub mod analysis;
pub mod builder;
pub mod grammar;
pub mod matcher;
pub mod memo;

/// Re-export commonly used types for convenience
pub use analysis::{GrammarAnalyzer, GrammarWarning, WarningKind};
pub use builder::{Clause, ClauseExt, GrammarBuilder, GrammarError};
pub use grammar::{Atom, Grammar};
pub use matcher::Matcher;
pub use memo::MemoKey;
