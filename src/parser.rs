use std::rc::Rc;

use crate::closure::ParseClosure;
use crate::position::ParserPosition;
use crate::state::ParseState;

/// A grammar node.
///
/// `run` is invoked at most once per (node, position) in a parse; results are
/// delivered through `closure.success`, and waiting for the next token goes
/// through `state.read`. A node that does neither is a dead end, optionally
/// reported via `closure.failure` from within a continuation.
///
/// Nodes are identified by reference: cloning a [`ParserRef`] shares the node
/// (and its memoized work), constructing twice yields two distinct nodes.
pub trait Parser<T: 'static, P: ParserPosition<T>> {
    type Output: Clone + 'static;

    /// Human-readable description of what this node accepts, used in
    /// failure diagnostics ("expected {describe} at {position}").
    fn describe(&self) -> String;

    fn run(&self, closure: &Rc<ParseClosure<Self::Output, T, P>>, state: &ParseState<T, P>);
}

/// Shared handle to a grammar node.
pub type ParserRef<T, P, A> = Rc<dyn Parser<T, P, Output = A>>;
