use crate::position::ParserPosition;
use crate::state::ParseState;

/// A suspended parse awaiting the next token.
///
/// The driving loop invokes exactly one of the two methods, exactly once, on
/// every registered continuation: `token` when input advances, `eof` when it
/// is exhausted. The passed state is the one at the new position.
pub trait Continuation<T: 'static, P: ParserPosition<T>> {
    fn token(&self, token: &T, state: &ParseState<T, P>);

    fn eof(&self, state: &ParseState<T, P>);
}
