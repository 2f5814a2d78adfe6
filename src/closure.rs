use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use tracing::trace;

use crate::failure::ParserFailure;
use crate::parser::ParserRef;
use crate::position::ParserPosition;
use crate::state::ParseState;

/// Callback receiving one parse result in the state it was produced in.
pub type SuccessHandler<A, T, P> = Rc<dyn Fn(&A, &ParseState<T, P>)>;

/// Type-erased view of a closure used for walking parent chains, so that a
/// closure can hold its requester without knowing the requester's output
/// type.
pub trait FailureValidity<P> {
    /// Whether this closure still counts as a reportable dead end.
    fn is_valid_failure(&self) -> bool;

    /// Whether this closure or any of its ancestors has delivered a result
    /// strictly past `position`.
    fn subsumes(&self, position: &P) -> bool;
}

/// One memoized attempt of one grammar node at one input position.
///
/// Results and subscribers accumulate over the parse: a subscriber arriving
/// after results exist receives the full backlog on registration, and every
/// subscriber is notified of every later result, so ordering of discovery
/// never loses a derivation. Lists are append-only and traversed by index so
/// re-entrant subscription or production during notification stays safe.
pub struct ParseClosure<A, T, P>
where
    A: Clone + 'static,
    T: 'static,
    P: ParserPosition<T>,
{
    parser: ParserRef<T, P, A>,
    position: P,
    results: RefCell<SmallVec<[A; 2]>>,
    handlers: RefCell<SmallVec<[SuccessHandler<A, T, P>; 2]>>,
    /// Furthest position at which a result has been delivered.
    furthest: RefCell<Option<P>>,
    parent: Option<Rc<dyn FailureValidity<P>>>,
    /// False disables failure bookkeeping entirely (success-only runs).
    tracking: bool,
    this: Weak<Self>,
}

impl<A, T, P> ParseClosure<A, T, P>
where
    A: Clone + 'static,
    T: 'static,
    P: ParserPosition<T>,
{
    pub(crate) fn new(
        parser: ParserRef<T, P, A>,
        position: P,
        parent: Option<Rc<dyn FailureValidity<P>>>,
        tracking: bool,
    ) -> Rc<Self> {
        Rc::new_cyclic(|this| ParseClosure {
            parser,
            position,
            results: RefCell::new(SmallVec::new()),
            handlers: RefCell::new(SmallVec::new()),
            furthest: RefCell::new(None),
            parent,
            tracking,
            this: this.clone(),
        })
    }

    /// Position this attempt started at.
    pub fn position(&self) -> &P {
        &self.position
    }

    /// Registers `handler` and replays every already-produced result to it in
    /// production order. The backlog length is snapshotted first, so results
    /// produced re-entrantly during replay are delivered through notification
    /// rather than twice.
    pub fn handle(&self, handler: SuccessHandler<A, T, P>, state: &ParseState<T, P>) {
        let backlog = self.results.borrow().len();
        self.handlers.borrow_mut().push(Rc::clone(&handler));
        for index in 0..backlog {
            let result = self.results.borrow()[index].clone();
            (*handler)(&result, state);
        }
    }

    /// Records one result, delivered in `state`, and notifies every handler
    /// registered at this instant in registration order.
    pub fn success(&self, result: A, state: &ParseState<T, P>) {
        trace!(parser = %self.parser.describe(), at = %state.position(), "success");
        self.results.borrow_mut().push(result.clone());
        {
            let mut furthest = self.furthest.borrow_mut();
            let delivered = state.position();
            if furthest.as_ref().map_or(true, |best| delivered > best) {
                *furthest = Some(delivered.clone());
            }
        }
        if self.tracking {
            state.sweep_failures();
        }
        let notified = self.handlers.borrow().len();
        for index in 0..notified {
            let handler = Rc::clone(&self.handlers.borrow()[index]);
            (*handler)(&result, state);
        }
    }

    /// Reports this attempt as a dead end. Recorded only while the closure is
    /// still a valid failure; success-only closures ignore the call.
    pub fn failure(&self, state: &ParseState<T, P>) {
        if !self.tracking || !self.is_valid_failure() {
            return;
        }
        if let Some(link) = self.this.upgrade() {
            state.record_failure(
                link,
                ParserFailure::new(self.parser.describe(), self.position.clone()),
            );
        }
    }
}

impl<A, T, P> FailureValidity<P> for ParseClosure<A, T, P>
where
    A: Clone + 'static,
    T: 'static,
    P: ParserPosition<T>,
{
    /// Valid iff this attempt produced nothing and no ancestor consumed past
    /// its start. An ancestor's shorter success does not explain away a
    /// longer attempt's dead end; one that read further does.
    fn is_valid_failure(&self) -> bool {
        self.tracking
            && self.results.borrow().is_empty()
            && self
                .parent
                .as_ref()
                .map_or(true, |parent| !parent.subsumes(&self.position))
    }

    fn subsumes(&self, position: &P) -> bool {
        if self
            .furthest
            .borrow()
            .as_ref()
            .map_or(false, |furthest| furthest > position)
        {
            return true;
        }
        self.parent
            .as_ref()
            .map_or(false, |parent| parent.subsumes(position))
    }
}
