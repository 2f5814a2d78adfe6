//! Grammar combinators built on the engine primitives: every node here is
//! expressed through `state.parse`, `state.read` and `closure.success` only,
//! so sharing and failure tracking fall out of the core machinery.

pub mod and;
pub mod eof;
pub mod literal;
pub mod many;
pub mod map;
pub mod or;
pub mod some;
pub mod token;

pub use and::{AndExt, and};
pub use eof::eof;
pub use literal::literal;
pub use many::many;
pub use map::{MapExt, map};
pub use or::{OrExt, or};
pub use some::some;
pub use token::{any_token, is_token, token_matching};
