//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from
//! topdown. Importing this module with a wildcard import brings the core
//! surface into scope:
//!
//! ```
//! use topdown::prelude::*;
//!
//! let grammar = GrammarBuilder::new()
//!     .rule("word", range('a', 'z').many1())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(grammar.match_len("hello!"), Some(5));
//! ```

// ============================================================================
// Core Types
// ============================================================================

pub use crate::grammar::{Atom, Grammar};
pub use crate::matcher::Matcher;

// ============================================================================
// Builder DSL
// ============================================================================

pub use crate::builder::{
    choice, dynamic, end, lit, range, ref_, seq, start, Clause, ClauseExt, GrammarBuilder,
    GrammarError,
};

// ============================================================================
// Diagnostics
// ============================================================================

pub use crate::analysis::{GrammarAnalyzer, GrammarWarning, WarningKind};
