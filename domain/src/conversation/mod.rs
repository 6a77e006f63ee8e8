//! Conversational state and back-reference detection

pub mod reference;
pub mod state;

pub use reference::{ReferenceKind, detect_reference};
pub use state::{ConversationState, ConversationTurn, HISTORY_WINDOW, SessionId};
