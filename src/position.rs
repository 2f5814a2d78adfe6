use std::fmt;

/// Immutable, totally ordered progress marker through a token stream.
///
/// Positions are pure values: advancing over the same token from the same
/// position always yields the same successor, and the total order is what
/// "longest match" selection compares. The engine ships [`IndexPosition`]
/// but accepts any conforming implementation (e.g. line/column tracking).
pub trait ParserPosition<T>: Clone + Ord + fmt::Debug + fmt::Display + 'static {
    /// The position reached after consuming `token` at this position.
    fn next(&self, token: &T) -> Self;
}

/// Default position: the number of tokens consumed so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IndexPosition(pub usize);

impl IndexPosition {
    pub fn new(index: usize) -> Self {
        IndexPosition(index)
    }

    /// Number of tokens consumed to reach this position.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for IndexPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T> ParserPosition<T> for IndexPosition {
    fn next(&self, _token: &T) -> Self {
        IndexPosition(self.0 + 1)
    }
}
