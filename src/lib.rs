//! Chart-based parser combinators.
//!
//! Grammar nodes compose into a graph; a single left-to-right pass over the
//! token stream drives every pending derivation one token at a time, in
//! continuation-passing style.
//!
//! - Full ambiguity: every valid derivation is reported, not just the first.
//! - Sharing: one memoized attempt per (node, position), so a sub-grammar
//!   reached along several paths runs once and feeds all of them.
//! - Single pass: the source is consumed token by token; no position is
//!   visited twice and no input is re-read.
//! - Precise failures: dead ends survive only while no success consumed past
//!   them, so diagnostics name the real frontier instead of every branch
//!   that lost.
//!
//! [`SuccessParserEngine`] reports derivations only; [`FailureParserEngine`]
//! additionally returns the surviving dead ends. The [`aggregate`] functions
//! cover the common collect/longest/error patterns, and [`grammar`] carries
//! the combinator layer.

pub mod aggregate;
pub mod closure;
pub mod continuation;
pub mod engine;
pub mod failure;
pub mod grammar;
pub mod parser;
pub mod position;
pub mod source;
pub mod state;

pub use aggregate::{
    parse_longest_success, parse_longest_success_or_failures,
    parse_longest_success_or_longest_failure, parse_successes, parse_successes_or_failures,
};
pub use closure::{FailureValidity, ParseClosure, SuccessHandler};
pub use continuation::Continuation;
pub use engine::{FailureParserEngine, SuccessParserEngine};
pub use failure::{ParseError, ParserFailure};
pub use parser::{Parser, ParserRef};
pub use position::{IndexPosition, ParserPosition};
pub use source::{ParserSource, source};
pub use state::ParseState;
