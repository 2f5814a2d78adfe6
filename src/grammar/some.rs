use std::rc::Rc;

use crate::closure::ParseClosure;
use crate::parser::{Parser, ParserRef};
use crate::position::ParserPosition;
use crate::state::ParseState;

use super::many::accumulate;

struct Some<T, P, A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    item: ParserRef<T, P, A>,
}

impl<T, P, A> Parser<T, P> for Some<T, P, A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    type Output = Vec<A>;

    fn describe(&self) -> String {
        format!("one or more {}", self.item.describe())
    }

    fn run(&self, closure: &Rc<ParseClosure<Vec<A>, T, P>>, state: &ParseState<T, P>) {
        accumulate(&self.item, closure, Rc::new(Vec::new()), state);
    }
}

/// One or more `item`s; like [`super::many`] without the empty prefix.
pub fn some<T, P, A>(item: ParserRef<T, P, A>) -> ParserRef<T, P, Vec<A>>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    Rc::new(Some { item })
}
