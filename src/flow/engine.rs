//! The conversation engine — runs one turn of the intake state machine per
//! inbound message.

use std::sync::Arc;

use tracing::{info, warn};

use crate::store::SessionStore;
use crate::webhook::{IntakePayload, NotificationSink};

use super::classifier::classify;
use super::extractor::FieldExtractor;
use super::prompts::{clarification_question, completion_message};
use super::state::{ConversationState, FlowNode, Program};

/// The reply returned to the caller after one turn.
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub reply: String,
    pub session_id: String,
}

/// Coordinates one conversation turn: load state, route, extract, reply,
/// notify on completion, persist.
///
/// Downstream failures never surface to the caller — a load failure starts
/// a fresh state, and save/notify failures are logged while the turn still
/// produces a conversational reply.
pub struct ConversationFlow {
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn NotificationSink>,
    extractor: FieldExtractor,
}

impl ConversationFlow {
    pub fn new(store: Arc<dyn SessionStore>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            store,
            notifier,
            extractor: FieldExtractor::new(),
        }
    }

    /// Process one user message for a session and produce the assistant
    /// reply. The sole entry point; safe to call repeatedly per session.
    pub async fn process_message(&self, message: &str, session_id: &str) -> TurnReply {
        let mut state = match self.store.load_session(session_id).await {
            Ok(Some(state)) => state,
            Ok(None) => ConversationState::new(session_id),
            Err(e) => {
                warn!(session_id, error = %e, "Failed to load session, starting fresh");
                ConversationState::new(session_id)
            }
        };

        state.push_user(message);
        state.current_node = FlowNode::Start;

        // Sticky routing: the router runs once per conversation.
        let routed_this_turn = state.program.is_none();
        let program = match state.program {
            Some(program) => program,
            None => {
                state.current_node = FlowNode::Router;
                let program = classify(message);
                state.program = Some(program);
                info!(session_id, program = %program, "Session routed");
                program
            }
        };

        // The routing turn's message names the program; it is never
        // captured as the assistance request.
        self.extractor
            .extract_into(&mut state, message, !routed_this_turn);

        let reply = match state.missing_fields().first() {
            Some(field) => clarification_question(*field, program),
            None => {
                self.notify_once(&mut state, program).await;
                completion_message(program)
            }
        };

        state.push_assistant(reply.clone());
        state.current_node = FlowNode::from(program);

        if let Err(e) = self.store.save_session(&state).await {
            warn!(session_id, error = %e, "Failed to persist session");
        }

        TurnReply {
            reply,
            session_id: state.session_id.clone(),
        }
    }

    /// Fire the completion notification at most once per session.
    ///
    /// The flag is set whether or not delivery succeeds: one attempt, no
    /// retry. Delivery failure is logged and does not abort the turn.
    async fn notify_once(&self, state: &mut ConversationState, program: Program) {
        if state.webhook_sent {
            return;
        }

        let (Some(name), Some(age), Some(request)) = (
            state.beneficiary_name.clone(),
            state.beneficiary_age,
            state.assistance_request.clone(),
        ) else {
            return;
        };

        state.webhook_sent = true;

        let payload = IntakePayload {
            beneficiary_name: name,
            beneficiary_age: age,
            assistance_request: request,
            program,
        };

        match self.notifier.notify(&payload).await {
            Ok(()) => info!(
                session_id = %state.session_id,
                program = %program,
                "Completion notification sent"
            ),
            Err(e) => warn!(
                session_id = %state.session_id,
                error = %e,
                "Completion notification failed"
            ),
        }
    }
}
