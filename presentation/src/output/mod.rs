//! Console output.

mod console;

pub use console::ConsoleFormatter;
