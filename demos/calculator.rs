//! Arithmetic expression matcher
//!
//! Builds the classic PEG arithmetic grammar (additive / multiplicative /
//! parenthesized primary) and prints how many bytes of the input it
//! consumes, or 0 if the input does not match. The grammar is built once
//! into a process-wide singleton; every match shares the same immutable
//! arena.

use std::sync::OnceLock;
use topdown::prelude::*;

static CALCULATOR: OnceLock<Grammar> = OnceLock::new();

/// The shared arithmetic grammar
fn calculator() -> &'static Grammar {
    CALCULATOR.get_or_init(|| {
        GrammarBuilder::new()
            .rule("Toplevel", start().then(ref_("Additive")).then(end()))
            .rule(
                "Additive",
                ref_("Multiplicative")
                    .then(lit('+'))
                    .then(ref_("Additive"))
                    .or(ref_("Multiplicative")),
            )
            .rule(
                "Multiplicative",
                ref_("Primary")
                    .then(lit('*'))
                    .then(ref_("Multiplicative"))
                    .or(ref_("Primary")),
            )
            .rule(
                "Primary",
                lit('(')
                    .then(ref_("Additive"))
                    .then(lit(')'))
                    .or(ref_("Number")),
            )
            .rule("Number", range('0', '9').many1())
            .build()
            .expect("all rule references are defined above")
    })
}

fn main() {
    let input = std::env::args().nth(1).unwrap_or_else(|| "(1+1)+1*(5+5)".to_string());
    let consumed = calculator().match_rule("Toplevel", &input).unwrap_or(0);
    println!("{}", consumed);
}
