use std::rc::Rc;

use crate::closure::{FailureValidity, ParseClosure};
use crate::parser::{Parser, ParserRef};
use crate::position::ParserPosition;
use crate::state::ParseState;

struct And<T, P, A, B>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
    B: Clone + 'static,
{
    first: ParserRef<T, P, A>,
    second: ParserRef<T, P, B>,
}

impl<T, P, A, B> Parser<T, P> for And<T, P, A, B>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
    B: Clone + 'static,
{
    type Output = (A, B);

    fn describe(&self) -> String {
        format!("{} then {}", self.first.describe(), self.second.describe())
    }

    fn run(&self, closure: &Rc<ParseClosure<(A, B), T, P>>, state: &ParseState<T, P>) {
        let own = Rc::clone(closure);
        let second = Rc::clone(&self.second);
        let parent: Rc<dyn FailureValidity<P>> = closure.clone();
        let chain = Rc::clone(&parent);
        // The second parser is requested in whichever state each first-result
        // arrives in, so every first derivation continues independently.
        let first_handler = Rc::new(move |first: &A, state: &ParseState<T, P>| {
            let own = Rc::clone(&own);
            let first = first.clone();
            let second_handler = Rc::new(move |second_value: &B, state: &ParseState<T, P>| {
                own.success((first.clone(), second_value.clone()), state);
            });
            state.parse(&second, second_handler, Some(Rc::clone(&chain)));
        });
        state.parse(&self.first, first_handler, Some(parent));
    }
}

/// Runs `first`, then `second` from wherever each `first` derivation ended;
/// produces the pair of results.
pub fn and<T, P, A, B>(
    first: ParserRef<T, P, A>,
    second: ParserRef<T, P, B>,
) -> ParserRef<T, P, (A, B)>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
    B: Clone + 'static,
{
    Rc::new(And { first, second })
}

/// Chaining form of [`and`]. Sequencing left-associates, so `a.and(b).and(c)`
/// produces `((A, B), C)`.
pub trait AndExt<T, P, A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    fn and<B: Clone + 'static>(&self, second: ParserRef<T, P, B>) -> ParserRef<T, P, (A, B)>;
}

impl<T, P, A> AndExt<T, P, A> for ParserRef<T, P, A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    fn and<B: Clone + 'static>(&self, second: ParserRef<T, P, B>) -> ParserRef<T, P, (A, B)> {
        and(Rc::clone(self), second)
    }
}
