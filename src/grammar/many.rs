use std::rc::Rc;

use crate::closure::{FailureValidity, ParseClosure};
use crate::parser::{Parser, ParserRef};
use crate::position::ParserPosition;
use crate::state::ParseState;

struct Many<T, P, A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    item: ParserRef<T, P, A>,
}

impl<T, P, A> Parser<T, P> for Many<T, P, A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    type Output = Vec<A>;

    fn describe(&self) -> String {
        format!("zero or more {}", self.item.describe())
    }

    fn run(&self, closure: &Rc<ParseClosure<Vec<A>, T, P>>, state: &ParseState<T, P>) {
        closure.success(Vec::new(), state);
        accumulate(&self.item, closure, Rc::new(Vec::new()), state);
    }
}

/// One repetition step: requests `item` and, for each of its results, emits
/// the extended prefix as a success and recurses from the state the item
/// ended in. The repetition closure is the parent of every item request, so
/// an item dead end stays reportable until something consumes past it.
pub(super) fn accumulate<T, P, A>(
    item: &ParserRef<T, P, A>,
    closure: &Rc<ParseClosure<Vec<A>, T, P>>,
    collected: Rc<Vec<A>>,
    state: &ParseState<T, P>,
) where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    let item_parser = Rc::clone(item);
    let own = Rc::clone(closure);
    let handler = Rc::new(move |value: &A, state: &ParseState<T, P>| {
        let mut items = collected.as_ref().clone();
        items.push(value.clone());
        let items = Rc::new(items);
        own.success(items.as_ref().clone(), state);
        accumulate(&item_parser, &own, items, state);
    });
    let parent: Rc<dyn FailureValidity<P>> = closure.clone();
    state.parse(item, handler, Some(parent));
}

/// Zero or more `item`s; one success per matched prefix length, starting with
/// the empty one. Diverges on items that can succeed without consuming.
pub fn many<T, P, A>(item: ParserRef<T, P, A>) -> ParserRef<T, P, Vec<A>>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    Rc::new(Many { item })
}
