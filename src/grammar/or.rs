use std::rc::Rc;

use crate::closure::{FailureValidity, ParseClosure, SuccessHandler};
use crate::parser::{Parser, ParserRef};
use crate::position::ParserPosition;
use crate::state::ParseState;

struct Or<T, P, A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    left: ParserRef<T, P, A>,
    right: ParserRef<T, P, A>,
}

impl<T, P, A> Parser<T, P> for Or<T, P, A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    type Output = A;

    fn describe(&self) -> String {
        format!("{} or {}", self.left.describe(), self.right.describe())
    }

    fn run(&self, closure: &Rc<ParseClosure<A, T, P>>, state: &ParseState<T, P>) {
        let own = Rc::clone(closure);
        let forward: SuccessHandler<A, T, P> = Rc::new(move |value: &A, state: &ParseState<T, P>| {
            own.success(value.clone(), state);
        });
        let parent: Rc<dyn FailureValidity<P>> = closure.clone();
        state.parse(&self.left, Rc::clone(&forward), Some(Rc::clone(&parent)));
        state.parse(&self.right, forward, Some(parent));
    }
}

/// Tries both branches from the same position; every derivation of either
/// branch surfaces, preserving full ambiguity.
pub fn or<T, P, A>(left: ParserRef<T, P, A>, right: ParserRef<T, P, A>) -> ParserRef<T, P, A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    Rc::new(Or { left, right })
}

/// Chaining form of [`or`].
pub trait OrExt<T, P, A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    fn or(&self, other: ParserRef<T, P, A>) -> ParserRef<T, P, A>;
}

impl<T, P, A> OrExt<T, P, A> for ParserRef<T, P, A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    fn or(&self, other: ParserRef<T, P, A>) -> ParserRef<T, P, A> {
        or(Rc::clone(self), other)
    }
}
