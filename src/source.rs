use std::iter::Peekable;

/// Stateful, single-pass supplier of tokens. No rewind, no lookahead beyond
/// knowing whether another token exists.
pub trait ParserSource {
    type Token;

    /// True if `next` would yield a token.
    fn has_next(&mut self) -> bool;

    /// Consumes and returns the next token, or `None` at end of input.
    fn next(&mut self) -> Option<Self::Token>;
}

impl<I: Iterator> ParserSource for Peekable<I> {
    type Token = I::Item;

    fn has_next(&mut self) -> bool {
        self.peek().is_some()
    }

    fn next(&mut self) -> Option<I::Item> {
        Iterator::next(self)
    }
}

/// Wraps anything iterable as a [`ParserSource`].
pub fn source<I: IntoIterator>(input: I) -> Peekable<I::IntoIter> {
    input.into_iter().peekable()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_yields_in_order() {
        let mut tokens = source("abc".chars());
        assert!(tokens.has_next());
        assert_eq!(ParserSource::next(&mut tokens), Some('a'));
        assert_eq!(ParserSource::next(&mut tokens), Some('b'));
        assert_eq!(ParserSource::next(&mut tokens), Some('c'));
        assert!(!tokens.has_next());
        assert_eq!(ParserSource::next(&mut tokens), None);
    }

    #[test]
    fn test_source_accepts_vec() {
        let mut tokens = source(vec![1, 2]);
        assert_eq!(ParserSource::next(&mut tokens), Some(1));
        assert_eq!(ParserSource::next(&mut tokens), Some(2));
        assert!(!tokens.has_next());
    }
}
