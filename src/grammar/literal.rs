use std::rc::Rc;

use crate::closure::ParseClosure;
use crate::continuation::Continuation;
use crate::parser::{Parser, ParserRef};
use crate::position::ParserPosition;
use crate::state::ParseState;

struct Literal {
    text: Rc<str>,
    chars: Rc<[char]>,
}

impl<P: ParserPosition<char>> Parser<char, P> for Literal {
    type Output = String;

    fn describe(&self) -> String {
        format!("{:?}", &*self.text)
    }

    fn run(&self, closure: &Rc<ParseClosure<String, char, P>>, state: &ParseState<char, P>) {
        if self.chars.is_empty() {
            closure.success(String::new(), state);
            return;
        }
        state.read(Rc::new(MatchChar {
            text: Rc::clone(&self.text),
            chars: Rc::clone(&self.chars),
            index: 0,
            closure: Rc::clone(closure),
        }));
    }
}

struct MatchChar<P: ParserPosition<char>> {
    text: Rc<str>,
    chars: Rc<[char]>,
    index: usize,
    closure: Rc<ParseClosure<String, char, P>>,
}

impl<P: ParserPosition<char>> Continuation<char, P> for MatchChar<P> {
    fn token(&self, token: &char, state: &ParseState<char, P>) {
        if *token != self.chars[self.index] {
            self.closure.failure(state);
            return;
        }
        if self.index + 1 == self.chars.len() {
            self.closure.success(self.text.to_string(), state);
            return;
        }
        state.read(Rc::new(MatchChar {
            text: Rc::clone(&self.text),
            chars: Rc::clone(&self.chars),
            index: self.index + 1,
            closure: Rc::clone(&self.closure),
        }));
    }

    fn eof(&self, state: &ParseState<char, P>) {
        self.closure.failure(state);
    }
}

/// Accepts the exact character sequence `text`, producing it as a `String`.
/// The empty literal succeeds without consuming anything.
pub fn literal<P: ParserPosition<char>>(text: &str) -> ParserRef<char, P, String> {
    Rc::new(Literal {
        text: Rc::from(text),
        chars: text.chars().collect::<Vec<_>>().into(),
    })
}
