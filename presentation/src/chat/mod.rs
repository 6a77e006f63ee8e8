//! Interactive chat.

mod repl;

pub use repl::ChatRepl;
