use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::closure::{FailureValidity, ParseClosure, SuccessHandler};
use crate::continuation::Continuation;
use crate::failure::{FailureSet, ParserFailure};
use crate::parser::ParserRef;
use crate::position::ParserPosition;

/// The chart slice for one input position.
///
/// Owns the closure table keyed by grammar-node identity (the `Rc` data
/// pointer) so a node requested twice at the same position shares one
/// attempt, plus the list of continuations waiting for the next token.
pub struct ParseState<T: 'static, P: ParserPosition<T>> {
    position: P,
    closures: RefCell<FxHashMap<*const (), Rc<dyn Any>>>,
    pending: RefCell<SmallVec<[Rc<dyn Continuation<T, P>>; 4]>>,
    /// Present iff this run tracks failures.
    failures: Option<Rc<FailureSet<P>>>,
    /// Set once input is exhausted; reads are refused afterwards.
    terminal: Cell<bool>,
}

impl<T: 'static, P: ParserPosition<T>> ParseState<T, P> {
    pub(crate) fn new(position: P, failures: Option<Rc<FailureSet<P>>>) -> Self {
        ParseState {
            position,
            closures: RefCell::new(FxHashMap::default()),
            pending: RefCell::new(SmallVec::new()),
            failures,
            terminal: Cell::new(false),
        }
    }

    pub fn position(&self) -> &P {
        &self.position
    }

    /// Requests `parser` at this position on behalf of `handler`.
    ///
    /// The first request builds the closure, registers the handler, and runs
    /// the node; every later request for the same node only subscribes, so
    /// the node runs at most once here. `parent` is the requester's closure,
    /// threaded for failure-validity walks.
    pub fn parse<A: Clone + 'static>(
        &self,
        parser: &ParserRef<T, P, A>,
        handler: SuccessHandler<A, T, P>,
        parent: Option<Rc<dyn FailureValidity<P>>>,
    ) {
        let key = Rc::as_ptr(parser) as *const ();
        let existing = self.closures.borrow().get(&key).cloned();
        if let Some(shared) = existing {
            trace!(parser = %parser.describe(), at = %self.position, "closure shared");
            let Ok(closure) = shared.downcast::<ParseClosure<A, T, P>>() else {
                panic!("closure table entry does not match its node's output type");
            };
            closure.handle(handler, self);
            return;
        }

        trace!(parser = %parser.describe(), at = %self.position, "closure created");
        let closure = ParseClosure::new(
            Rc::clone(parser),
            self.position.clone(),
            parent,
            self.failures.is_some(),
        );
        let erased: Rc<dyn Any> = closure.clone();
        self.closures.borrow_mut().insert(key, erased);
        closure.handle(handler, self);
        parser.run(&closure, self);
    }

    /// Suspends a parse until the next token. On the terminal state the
    /// continuation is dropped; there is nothing left to read.
    pub fn read(&self, continuation: Rc<dyn Continuation<T, P>>) {
        if self.terminal.get() {
            trace!(at = %self.position, "read past end of input dropped");
            return;
        }
        self.pending.borrow_mut().push(continuation);
    }

    pub(crate) fn take_pending(&self) -> SmallVec<[Rc<dyn Continuation<T, P>>; 4]> {
        self.pending.take()
    }

    pub(crate) fn seal(&self) {
        self.terminal.set(true);
    }

    pub(crate) fn at_end(&self) -> bool {
        self.terminal.get()
    }

    pub(crate) fn record_failure(
        &self,
        link: Rc<dyn FailureValidity<P>>,
        failure: ParserFailure<P>,
    ) {
        if let Some(failures) = &self.failures {
            failures.record(link, failure);
        }
    }

    pub(crate) fn sweep_failures(&self) {
        if let Some(failures) = &self.failures {
            failures.sweep();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::closure::ParseClosure;
    use crate::parser::Parser;
    use crate::position::IndexPosition;

    /// Succeeds immediately with 'x' and counts how often it is run.
    struct Counting {
        runs: Cell<usize>,
    }

    impl Parser<char, IndexPosition> for Counting {
        type Output = char;

        fn describe(&self) -> String {
            "counting".to_string()
        }

        fn run(
            &self,
            closure: &Rc<ParseClosure<char, char, IndexPosition>>,
            state: &ParseState<char, IndexPosition>,
        ) {
            self.runs.set(self.runs.get() + 1);
            closure.success('x', state);
        }
    }

    fn collector() -> (
        Rc<RefCell<Vec<char>>>,
        SuccessHandler<char, char, IndexPosition>,
    ) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let handler: SuccessHandler<char, char, IndexPosition> =
            Rc::new(move |result: &char, _: &ParseState<char, IndexPosition>| {
                log.borrow_mut().push(*result);
            });
        (seen, handler)
    }

    #[test]
    fn test_same_node_runs_once_and_feeds_every_requester() {
        let node = Rc::new(Counting {
            runs: Cell::new(0),
        });
        let parser: ParserRef<char, IndexPosition, char> = node.clone();
        let state = ParseState::new(IndexPosition(0), None);

        let (first_seen, first) = collector();
        let (second_seen, second) = collector();
        state.parse(&parser, first, None);
        state.parse(&parser, second, None);

        assert_eq!(node.runs.get(), 1);
        assert_eq!(*first_seen.borrow(), vec!['x']);
        assert_eq!(*second_seen.borrow(), vec!['x']);
    }

    #[test]
    fn test_identity_not_structure_keys_the_table() {
        let left = Rc::new(Counting {
            runs: Cell::new(0),
        });
        let right = Rc::new(Counting {
            runs: Cell::new(0),
        });
        let left_parser: ParserRef<char, IndexPosition, char> = left.clone();
        let right_parser: ParserRef<char, IndexPosition, char> = right.clone();
        let state = ParseState::new(IndexPosition(0), None);

        let (_, first) = collector();
        let (_, second) = collector();
        state.parse(&left_parser, first, None);
        state.parse(&right_parser, second, None);

        assert_eq!(left.runs.get(), 1);
        assert_eq!(right.runs.get(), 1);
    }

    struct Idle;

    impl Continuation<char, IndexPosition> for Idle {
        fn token(&self, _token: &char, _state: &ParseState<char, IndexPosition>) {}

        fn eof(&self, _state: &ParseState<char, IndexPosition>) {}
    }

    #[test]
    fn test_sealed_state_refuses_continuations() {
        let state: ParseState<char, IndexPosition> = ParseState::new(IndexPosition(0), None);
        state.read(Rc::new(Idle));
        assert_eq!(state.take_pending().len(), 1);

        state.seal();
        state.read(Rc::new(Idle));
        assert_eq!(state.take_pending().len(), 0);
    }
}
