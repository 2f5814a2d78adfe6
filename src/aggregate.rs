use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::{FailureParserEngine, SuccessParserEngine};
use crate::failure::{ParseError, ParserFailure};
use crate::parser::ParserRef;
use crate::position::ParserPosition;
use crate::source::ParserSource;

/// Every derivation of `parser` over `source`, in discovery order.
pub fn parse_successes<T, P, A, S>(parser: &ParserRef<T, P, A>, source: S, start: P) -> Vec<A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
    S: ParserSource<Token = T>,
{
    let results = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&results);
    SuccessParserEngine.parse(parser, source, start, move |result, _position| {
        sink.borrow_mut().push(result);
    });
    results.take()
}

/// Every derivation, or every surviving dead end when there are none.
///
/// A run that produces both successes and valid failures, or neither, is a
/// grammar-wiring bug and panics; anchoring the grammar with
/// [`crate::grammar::eof`] keeps it out of the mixed case.
pub fn parse_successes_or_failures<T, P, A, S>(
    parser: &ParserRef<T, P, A>,
    source: S,
    start: P,
) -> Result<Vec<A>, ParseError<P>>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
    S: ParserSource<Token = T>,
{
    let results = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&results);
    let failures = FailureParserEngine.parse(parser, source, start, move |result, _position| {
        sink.borrow_mut().push(result);
    });
    let successes = results.take();
    match (successes.is_empty(), failures.is_empty()) {
        (false, true) => Ok(successes),
        (true, false) => Err(ParseError::new(failures)),
        (false, false) => panic!(
            "parse produced {} successes alongside {} unsubsumed failures; the grammar delivers results inconsistently",
            successes.len(),
            failures.len()
        ),
        (true, true) => panic!("parse finished with neither successes nor failures"),
    }
}

/// The derivation that consumed the most input, or `None`. Ties keep the
/// first-discovered result.
pub fn parse_longest_success<T, P, A, S>(
    parser: &ParserRef<T, P, A>,
    source: S,
    start: P,
) -> Option<A>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
    S: ParserSource<Token = T>,
{
    let best: Rc<RefCell<Option<(A, P)>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&best);
    SuccessParserEngine.parse(parser, source, start, move |result, position| {
        let mut best = sink.borrow_mut();
        if best.as_ref().map_or(true, |(_, at)| position > *at) {
            *best = Some((result, position));
        }
    });
    best.take().map(|(result, _)| result)
}

/// Longest derivation, or every surviving dead end when there is none.
pub fn parse_longest_success_or_failures<T, P, A, S>(
    parser: &ParserRef<T, P, A>,
    source: S,
    start: P,
) -> Result<A, ParseError<P>>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
    S: ParserSource<Token = T>,
{
    let (best, failures) = longest_with_failures(parser, source, start);
    match best {
        Some((result, _)) => Ok(result),
        None if !failures.is_empty() => Err(ParseError::new(failures)),
        None => panic!("parse finished with neither successes nor failures"),
    }
}

/// Longest derivation, or the dead end that progressed furthest.
pub fn parse_longest_success_or_longest_failure<T, P, A, S>(
    parser: &ParserRef<T, P, A>,
    source: S,
    start: P,
) -> Result<A, ParserFailure<P>>
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
    S: ParserSource<Token = T>,
{
    let (best, failures) = longest_with_failures(parser, source, start);
    match best {
        Some((result, _)) => Ok(result),
        None => {
            let furthest = failures.into_iter().reduce(|best, candidate| {
                if candidate.position() > best.position() {
                    candidate
                } else {
                    best
                }
            });
            match furthest {
                Some(failure) => Err(failure),
                None => panic!("parse finished with neither successes nor failures"),
            }
        }
    }
}

fn longest_with_failures<T, P, A, S>(
    parser: &ParserRef<T, P, A>,
    source: S,
    start: P,
) -> (Option<(A, P)>, Vec<ParserFailure<P>>)
where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
    S: ParserSource<Token = T>,
{
    let best: Rc<RefCell<Option<(A, P)>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&best);
    let failures = FailureParserEngine.parse(parser, source, start, move |result, position| {
        let mut best = sink.borrow_mut();
        if best.as_ref().map_or(true, |(_, at)| position > *at) {
            *best = Some((result, position));
        }
    });
    (best.take(), failures)
}
