use std::rc::Rc;

use crate::closure::ParseClosure;
use crate::continuation::Continuation;
use crate::parser::{Parser, ParserRef};
use crate::position::ParserPosition;
use crate::state::ParseState;

struct Eof;

impl<T: 'static, P: ParserPosition<T>> Parser<T, P> for Eof {
    type Output = ();

    fn describe(&self) -> String {
        "end of input".to_string()
    }

    fn run(&self, closure: &Rc<ParseClosure<(), T, P>>, state: &ParseState<T, P>) {
        // Requested while the terminal state is already firing: succeed now,
        // there is no further token to wait for.
        if state.at_end() {
            closure.success((), state);
            return;
        }
        state.read(Rc::new(AtEnd {
            closure: Rc::clone(closure),
        }));
    }
}

struct AtEnd<T: 'static, P: ParserPosition<T>> {
    closure: Rc<ParseClosure<(), T, P>>,
}

impl<T: 'static, P: ParserPosition<T>> Continuation<T, P> for AtEnd<T, P> {
    fn token(&self, _token: &T, state: &ParseState<T, P>) {
        self.closure.failure(state);
    }

    fn eof(&self, state: &ParseState<T, P>) {
        self.closure.success((), state);
    }
}

/// Succeeds with `()` only when the input is exhausted. Anchoring a grammar
/// with this keeps partial-prefix derivations from counting as successes.
pub fn eof<T: 'static, P: ParserPosition<T>>() -> ParserRef<T, P, ()> {
    Rc::new(Eof)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::aggregate::{parse_successes, parse_successes_or_failures};
    use crate::position::IndexPosition;
    use crate::source::source;

    #[test]
    fn test_eof_succeeds_on_empty_input() {
        let parser: ParserRef<char, IndexPosition, ()> = eof();
        let successes = parse_successes(&parser, source("".chars()), IndexPosition::default());
        assert_eq!(successes, vec![()]);
    }

    #[test]
    fn test_eof_rejects_remaining_tokens() {
        let parser: ParserRef<char, IndexPosition, ()> = eof();
        let error = parse_successes_or_failures(&parser, source("a".chars()), IndexPosition::default())
            .unwrap_err();
        assert_eq!(error.to_string(), "syntax error: expected end of input at 0");
    }
}
