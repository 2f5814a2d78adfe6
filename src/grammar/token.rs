use std::borrow::Cow;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::closure::ParseClosure;
use crate::continuation::Continuation;
use crate::parser::{Parser, ParserRef};
use crate::position::ParserPosition;
use crate::state::ParseState;

struct TokenMatching<T, F> {
    predicate: Rc<F>,
    expected: Cow<'static, str>,
    _marker: PhantomData<fn(&T)>,
}

impl<T, P, F> Parser<T, P> for TokenMatching<T, F>
where
    T: Clone + 'static,
    P: ParserPosition<T>,
    F: Fn(&T) -> bool + 'static,
{
    type Output = T;

    fn describe(&self) -> String {
        self.expected.to_string()
    }

    fn run(&self, closure: &Rc<ParseClosure<T, T, P>>, state: &ParseState<T, P>) {
        state.read(Rc::new(ReadToken {
            predicate: Rc::clone(&self.predicate),
            closure: Rc::clone(closure),
        }));
    }
}

struct ReadToken<T, P, F>
where
    T: Clone + 'static,
    P: ParserPosition<T>,
{
    predicate: Rc<F>,
    closure: Rc<ParseClosure<T, T, P>>,
}

impl<T, P, F> Continuation<T, P> for ReadToken<T, P, F>
where
    T: Clone + 'static,
    P: ParserPosition<T>,
    F: Fn(&T) -> bool + 'static,
{
    fn token(&self, token: &T, state: &ParseState<T, P>) {
        if (*self.predicate)(token) {
            self.closure.success(token.clone(), state);
        } else {
            self.closure.failure(state);
        }
    }

    fn eof(&self, state: &ParseState<T, P>) {
        self.closure.failure(state);
    }
}

/// Accepts one token satisfying `predicate`; `expected` names it in
/// diagnostics.
pub fn token_matching<T, P, F>(
    predicate: F,
    expected: impl Into<Cow<'static, str>>,
) -> ParserRef<T, P, T>
where
    T: Clone + 'static,
    P: ParserPosition<T>,
    F: Fn(&T) -> bool + 'static,
{
    Rc::new(TokenMatching {
        predicate: Rc::new(predicate),
        expected: expected.into(),
        _marker: PhantomData,
    })
}

/// Accepts exactly `token`.
pub fn is_token<T, P>(token: T) -> ParserRef<T, P, T>
where
    T: Clone + Debug + PartialEq + 'static,
    P: ParserPosition<T>,
{
    let expected = format!("{token:?}");
    token_matching(move |candidate: &T| *candidate == token, expected)
}

/// Accepts any single token.
pub fn any_token<T, P>() -> ParserRef<T, P, T>
where
    T: Clone + 'static,
    P: ParserPosition<T>,
{
    token_matching(|_| true, "any token")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::aggregate::{parse_successes, parse_successes_or_failures};
    use crate::position::IndexPosition;
    use crate::source::source;

    #[test]
    fn test_is_token_matches() {
        let parser: ParserRef<char, IndexPosition, char> = is_token('a');
        let successes = parse_successes(&parser, source("a".chars()), IndexPosition::default());
        assert_eq!(successes, vec!['a']);
    }

    #[test]
    fn test_is_token_reports_mismatch() {
        let parser: ParserRef<char, IndexPosition, char> = is_token('a');
        let error = parse_successes_or_failures(&parser, source("b".chars()), IndexPosition::default())
            .unwrap_err();
        assert_eq!(error.to_string(), "syntax error: expected 'a' at 0");
    }

    #[test]
    fn test_token_matching_uses_its_label() {
        let parser: ParserRef<char, IndexPosition, char> =
            token_matching(|c: &char| c.is_ascii_digit(), "digit");
        let error = parse_successes_or_failures(&parser, source("x".chars()), IndexPosition::default())
            .unwrap_err();
        assert_eq!(error.to_string(), "syntax error: expected digit at 0");
    }

    #[test]
    fn test_any_token_consumes_one() {
        let parser: ParserRef<char, IndexPosition, char> = any_token();
        let successes = parse_successes(&parser, source("xy".chars()), IndexPosition::default());
        assert_eq!(successes, vec!['x']);
    }

    #[test]
    fn test_token_parsers_fail_at_end_of_input() {
        let parser: ParserRef<char, IndexPosition, char> = any_token();
        let error = parse_successes_or_failures(&parser, source("".chars()), IndexPosition::default())
            .unwrap_err();
        assert_eq!(error.to_string(), "syntax error: expected any token at 0");
    }
}
