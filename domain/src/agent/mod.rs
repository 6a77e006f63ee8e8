//! Agent routing domain: kinds, determinations, replies and the
//! heuristics that turn raw text into them.

pub mod classify;
pub mod kind;
pub mod parsing;
pub mod reply;

pub use classify::keyword_classify;
pub use kind::AgentKind;
pub use parsing::{extract_json, parse_agent_reply, parse_classification};
pub use reply::{AgentDetermination, AgentReply};
