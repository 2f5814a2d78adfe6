use std::rc::Rc;

use crate::closure::{FailureValidity, ParseClosure};
use crate::parser::{Parser, ParserRef};
use crate::position::ParserPosition;
use crate::state::ParseState;

struct Map<T, P, A, F>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    parser: ParserRef<T, P, A>,
    mapper: Rc<F>,
}

impl<T, P, A, B, F> Parser<T, P> for Map<T, P, A, F>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
    B: Clone + 'static,
    F: Fn(&A) -> B + 'static,
{
    type Output = B;

    fn describe(&self) -> String {
        self.parser.describe()
    }

    fn run(&self, closure: &Rc<ParseClosure<B, T, P>>, state: &ParseState<T, P>) {
        let own = Rc::clone(closure);
        let mapper = Rc::clone(&self.mapper);
        let parent: Rc<dyn FailureValidity<P>> = closure.clone();
        let handler = Rc::new(move |value: &A, state: &ParseState<T, P>| {
            own.success((*mapper)(value), state);
        });
        state.parse(&self.parser, handler, Some(parent));
    }
}

/// Transforms each result of `parser` with `mapper`; diagnostics keep the
/// inner parser's description.
pub fn map<T, P, A, B, F>(parser: ParserRef<T, P, A>, mapper: F) -> ParserRef<T, P, B>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
    B: Clone + 'static,
    F: Fn(&A) -> B + 'static,
{
    Rc::new(Map {
        parser,
        mapper: Rc::new(mapper),
    })
}

/// Chaining form of [`map`].
pub trait MapExt<T, P, A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    fn map<B, F>(&self, mapper: F) -> ParserRef<T, P, B>
    where
        B: Clone + 'static,
        F: Fn(&A) -> B + 'static;
}

impl<T, P, A> MapExt<T, P, A> for ParserRef<T, P, A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
{
    fn map<B, F>(&self, mapper: F) -> ParserRef<T, P, B>
    where
        B: Clone + 'static,
        F: Fn(&A) -> B + 'static,
    {
        map(Rc::clone(self), mapper)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::aggregate::parse_successes;
    use crate::grammar::{literal, some, token_matching};
    use crate::position::IndexPosition;
    use crate::source::source;

    #[test]
    fn test_map_transforms_each_result() {
        let parser = some(token_matching(|c: &char| c.is_ascii_digit(), "digit"))
            .map(|digits: &Vec<char>| digits.iter().collect::<String>());
        let successes = parse_successes(&parser, source("42".chars()), IndexPosition::default());
        assert_eq!(successes, vec!["4".to_string(), "42".to_string()]);
    }

    #[test]
    fn test_map_keeps_inner_description() {
        let parser: ParserRef<char, IndexPosition, usize> =
            literal("ab").map(|text: &String| text.len());
        assert_eq!(parser.describe(), "\"ab\"");
    }
}
