//! Conversation flow — the intake state machine and its helpers.
//!
//! One inbound user message runs the machine exactly once: route (first
//! turn only), extract fields, ask for the next missing field or emit the
//! completion message. Program nodes are terminal for the turn; the next
//! message restarts from `start`.

pub mod classifier;
pub mod engine;
pub mod extractor;
pub mod prompts;
pub mod state;

pub use engine::{ConversationFlow, TurnReply};
pub use extractor::FieldExtractor;
pub use state::{ChatMessage, ConversationState, FlowNode, IntakeField, MessageRole, Program};
