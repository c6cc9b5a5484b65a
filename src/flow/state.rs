//! Conversation state — the per-session record the intake machine mutates.

use serde::{Deserialize, Serialize};

/// The assistance program a conversation is routed into.
///
/// Set once by the router on the first turn and sticky afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Program {
    EmergencyFoodAid,
    NutritionSupport,
    GeneralFoodAccess,
}

impl Program {
    /// Wire/storage identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmergencyFoodAid => "emergency_food_aid",
            Self::NutritionSupport => "nutrition_support",
            Self::GeneralFoodAccess => "general_food_access",
        }
    }

    /// Parse a storage identifier back into a program.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "emergency_food_aid" => Some(Self::EmergencyFoodAid),
            "nutrition_support" => Some(Self::NutritionSupport),
            "general_food_access" => Some(Self::GeneralFoodAccess),
            _ => None,
        }
    }

    /// Human-facing program name used in assistant replies.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::EmergencyFoodAid => "Emergency Food Aid",
            Self::NutritionSupport => "Nutrition Support Program",
            Self::GeneralFoodAccess => "General Food Access Program",
        }
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The nodes of the intake state machine. `current_node` records the last
/// node visited and is diagnostic only — control flow never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowNode {
    Start,
    Router,
    EmergencyFoodAid,
    NutritionSupport,
    GeneralFoodAccess,
}

impl FlowNode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Router => "router",
            Self::EmergencyFoodAid => "emergency_food_aid",
            Self::NutritionSupport => "nutrition_support",
            Self::GeneralFoodAccess => "general_food_access",
        }
    }

    /// Parse a storage identifier, defaulting to `Start` for unknown values.
    pub fn parse_or_start(s: &str) -> Self {
        match s {
            "router" => Self::Router,
            "emergency_food_aid" => Self::EmergencyFoodAid,
            "nutrition_support" => Self::NutritionSupport,
            "general_food_access" => Self::GeneralFoodAccess,
            _ => Self::Start,
        }
    }
}

impl From<Program> for FlowNode {
    fn from(program: Program) -> Self {
        match program {
            Program::EmergencyFoodAid => Self::EmergencyFoodAid,
            Program::NutritionSupport => Self::NutritionSupport,
            Program::GeneralFoodAccess => Self::GeneralFoodAccess,
        }
    }
}

impl std::fmt::Display for FlowNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The beneficiary details the intake collects, in the order they are
/// asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeField {
    Name,
    Age,
    AssistanceRequest,
}

impl IntakeField {
    /// All fields, in clarification order.
    pub const ALL: [IntakeField; 3] = [Self::Name, Self::Age, Self::AssistanceRequest];
}

/// Who authored a message in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Per-session conversation state.
///
/// Created on the first message for a session id, mutated once per turn,
/// persisted after every turn, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub session_id: String,
    /// Full transcript, append-only.
    pub messages: Vec<ChatMessage>,
    pub program: Option<Program>,
    pub beneficiary_name: Option<String>,
    pub beneficiary_age: Option<u32>,
    pub assistance_request: Option<String>,
    pub current_node: FlowNode,
    /// Whether the completion notification has been attempted for this
    /// session. Guards against re-notifying on turns after completion.
    pub webhook_sent: bool,
}

impl ConversationState {
    /// Fresh state for a new session.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            messages: Vec::new(),
            program: None,
            beneficiary_name: None,
            beneficiary_age: None,
            assistance_request: None,
            current_node: FlowNode::Start,
            webhook_sent: false,
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: MessageRole::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: MessageRole::Assistant,
            content: content.into(),
        });
    }

    /// Still-missing beneficiary fields, in clarification order.
    pub fn missing_fields(&self) -> Vec<IntakeField> {
        IntakeField::ALL
            .into_iter()
            .filter(|field| match field {
                IntakeField::Name => self.beneficiary_name.is_none(),
                IntakeField::Age => self.beneficiary_age.is_none(),
                IntakeField::AssistanceRequest => self.assistance_request.is_none(),
            })
            .collect()
    }

    /// Whether all beneficiary fields have been collected.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
