//! `SessionStore` trait — the async persistence seam for conversation state.

use async_trait::async_trait;

use crate::error::DatabaseError;
use crate::flow::ConversationState;

/// Backend-agnostic session persistence.
///
/// Implementations must round-trip every state field, including the message
/// history as an ordered sequence. Writes are last-write-wins; there is no
/// cross-request isolation.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the state for a session, or `None` if the session is unknown.
    async fn load_session(
        &self,
        session_id: &str,
    ) -> Result<Option<ConversationState>, DatabaseError>;

    /// Insert or update the state for a session.
    async fn save_session(&self, state: &ConversationState) -> Result<(), DatabaseError>;
}
