//! Presentation layer for taskcrew
//!
//! The clap CLI definition, the console formatter and the interactive chat
//! REPL. Wiring happens in the binary crate.

pub mod chat;
pub mod cli;
pub mod output;

pub use chat::ChatRepl;
pub use cli::Cli;
pub use output::ConsoleFormatter;
