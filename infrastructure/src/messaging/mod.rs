//! Messaging transport adapters.

mod twilio;

pub use twilio::{ConsoleMessenger, TwilioMessenger};
