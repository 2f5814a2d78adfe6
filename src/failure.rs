use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tracing::trace;

use crate::closure::FailureValidity;

/// One dead end: what a grammar node expected and where its attempt began.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected} at {position}")]
pub struct ParserFailure<P: fmt::Debug + fmt::Display> {
    expected: String,
    position: P,
}

impl<P: fmt::Debug + fmt::Display> ParserFailure<P> {
    pub fn new(expected: impl Into<String>, position: P) -> Self {
        ParserFailure {
            expected: expected.into(),
            position,
        }
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn position(&self) -> &P {
        &self.position
    }
}

/// Syntax error aggregating every dead end that survived the parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error: {}", describe_failures(.failures))]
pub struct ParseError<P: fmt::Debug + fmt::Display> {
    failures: Vec<ParserFailure<P>>,
}

impl<P: fmt::Debug + fmt::Display> ParseError<P> {
    pub(crate) fn new(failures: Vec<ParserFailure<P>>) -> Self {
        ParseError { failures }
    }

    pub fn failures(&self) -> &[ParserFailure<P>] {
        &self.failures
    }
}

fn describe_failures<P: fmt::Debug + fmt::Display>(failures: &[ParserFailure<P>]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The run-wide collection of currently-valid failures. Each entry keeps the
/// type-erased closure link so later successes elsewhere can retract it.
pub(crate) struct FailureSet<P: fmt::Debug + fmt::Display> {
    entries: RefCell<Vec<(Rc<dyn FailureValidity<P>>, ParserFailure<P>)>>,
}

impl<P: fmt::Debug + fmt::Display> FailureSet<P> {
    pub(crate) fn new() -> Self {
        FailureSet {
            entries: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn record(&self, link: Rc<dyn FailureValidity<P>>, failure: ParserFailure<P>) {
        trace!(failure = %failure, "failure recorded");
        self.entries.borrow_mut().push((link, failure));
    }

    /// Drops every entry whose closure is no longer a valid failure.
    pub(crate) fn sweep(&self) {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(link, _)| link.is_valid_failure());
        let swept = before - entries.len();
        if swept > 0 {
            trace!(swept, "failures subsumed");
        }
    }

    pub(crate) fn take(&self) -> Vec<ParserFailure<P>> {
        self.entries
            .take()
            .into_iter()
            .map(|(_, failure)| failure)
            .collect()
    }
}
