use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::closure::SuccessHandler;
use crate::failure::{FailureSet, ParserFailure};
use crate::parser::ParserRef;
use crate::position::ParserPosition;
use crate::source::ParserSource;
use crate::state::ParseState;

/// Engine that reports every derivation and skips failure bookkeeping
/// entirely; closures in its runs never count as valid failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuccessParserEngine;

impl SuccessParserEngine {
    /// Runs `parser` over `source` from `start`, invoking `on_success` with
    /// each distinct derivation and the position it ended at.
    pub fn parse<T, P, A, S, F>(&self, parser: &ParserRef<T, P, A>, source: S, start: P, on_success: F)
    where
        T: 'static,
        P: ParserPosition<T>,
        A: Clone + 'static,
        S: ParserSource<Token = T>,
        F: FnMut(A, P) + 'static,
    {
        drive(parser, source, start, None, on_success);
    }
}

/// Engine that additionally tracks dead ends and returns the ones never
/// subsumed by a success further along.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailureParserEngine;

impl FailureParserEngine {
    pub fn parse<T, P, A, S, F>(
        &self,
        parser: &ParserRef<T, P, A>,
        source: S,
        start: P,
        on_success: F,
    ) -> Vec<ParserFailure<P>>
    where
        T: 'static,
        P: ParserPosition<T>,
        A: Clone + 'static,
        S: ParserSource<Token = T>,
        F: FnMut(A, P) + 'static,
    {
        let failures = Rc::new(FailureSet::new());
        drive(parser, source, start, Some(Rc::clone(&failures)), on_success);
        failures.take()
    }
}

/// The driving loop shared by both engines.
///
/// One state per visited position: request the top parser, then step while
/// continuations are pending, firing `token` into each fresh state. When the
/// source runs dry the last state is sealed and every remaining continuation
/// gets `eof`. No position is visited twice.
fn drive<T, P, A, S, F>(
    parser: &ParserRef<T, P, A>,
    mut source: S,
    start: P,
    failures: Option<Rc<FailureSet<P>>>,
    on_success: F,
) where
    T: 'static,
    P: ParserPosition<T>,
    A: Clone + 'static,
    S: ParserSource<Token = T>,
    F: FnMut(A, P) + 'static,
{
    let sink = RefCell::new(on_success);
    let top: SuccessHandler<A, T, P> = Rc::new(move |result: &A, state: &ParseState<T, P>| {
        (&mut *sink.borrow_mut())(result.clone(), state.position().clone())
    });

    let mut position = start;
    let mut state = ParseState::new(position.clone(), failures.clone());
    state.parse(parser, top, None);

    loop {
        let pending = state.take_pending();
        if pending.is_empty() {
            trace!(at = %position, "no pending continuations, parse finished");
            return;
        }
        match source.next() {
            Some(token) => {
                position = position.next(&token);
                trace!(at = %position, pending = pending.len(), "token step");
                state = ParseState::new(position.clone(), failures.clone());
                for continuation in &pending {
                    continuation.token(&token, &state);
                }
            }
            None => {
                trace!(at = %position, pending = pending.len(), "end of input");
                state.seal();
                for continuation in &pending {
                    continuation.eof(&state);
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::grammar::{AndExt, MapExt, and, eof, is_token, or, some, token_matching};
    use crate::position::IndexPosition;
    use crate::source::source;

    fn digits() -> ParserRef<char, IndexPosition, Vec<char>> {
        some(token_matching(|c: &char| c.is_ascii_digit(), "digit"))
    }

    fn collect<A: Clone + 'static>(
        parser: &ParserRef<char, IndexPosition, A>,
        input: &str,
    ) -> (Vec<A>, Vec<ParserFailure<IndexPosition>>) {
        let results = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&results);
        let failures = FailureParserEngine.parse(
            parser,
            source(input.chars()),
            IndexPosition::default(),
            move |result, _position| sink.borrow_mut().push(result),
        );
        (results.take(), failures)
    }

    #[test]
    fn test_repetition_keeps_the_failed_longer_attempt() {
        let parser = digits();
        let (successes, failures) = collect(&parser, "12a");
        assert_eq!(successes, vec![vec!['1'], vec!['1', '2']]);
        assert_eq!(failures, vec![ParserFailure::new("digit", IndexPosition(2))]);
    }

    #[test]
    fn test_sequence_failure_reports_only_the_dead_end() {
        let parser = and(is_token('a'), is_token('b'));
        let (successes, failures) = collect(&parser, "ac");
        assert_eq!(successes, vec![]);
        assert_eq!(failures, vec![ParserFailure::new("'b'", IndexPosition(1))]);
    }

    #[test]
    fn test_anchored_success_subsumes_interior_dead_ends() {
        let parser = digits()
            .and(is_token('a'))
            .and(eof())
            .map(|((digits, _), ())| digits.iter().collect::<String>());
        let (successes, failures) = collect(&parser, "12a");
        assert_eq!(successes, vec!["12".to_string()]);
        assert_eq!(failures, vec![]);
    }

    #[test]
    fn test_success_engine_reports_every_derivation() {
        let parser = digits();
        let results = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&results);
        SuccessParserEngine.parse(
            &parser,
            source("12".chars()),
            IndexPosition::default(),
            move |result: Vec<char>, position| sink.borrow_mut().push((result, position)),
        );
        assert_eq!(
            results.take(),
            vec![
                (vec!['1'], IndexPosition(1)),
                (vec!['1', '2'], IndexPosition(2)),
            ]
        );
    }

    #[test]
    fn test_shared_node_feeds_both_branches() {
        let shared = digits();
        let parser = or(shared.and(is_token('x')), shared.and(is_token('y')));
        let (successes, failures) = collect(&parser, "12x");
        assert_eq!(successes, vec![(vec!['1', '2'], 'x')]);
        assert_eq!(failures, vec![]);
    }
}
