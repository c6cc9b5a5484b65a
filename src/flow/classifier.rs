//! Keyword intent classifier — routes the first message into a program.

use super::state::Program;

/// Keywords that route a conversation into Emergency Food Aid.
/// Checked before the nutrition set; emergency always wins.
const EMERGENCY_KEYWORDS: &[&str] = &[
    "no food",
    "hunger crisis",
    "starving",
    "disaster",
    "displacement",
    "urgent",
    "immediate",
    "emergency",
    "no food available",
    "crisis",
];

/// Keywords that route a conversation into Nutrition Support.
const NUTRITION_KEYWORDS: &[&str] = &[
    "nutrition",
    "malnutrition",
    "child nutrition",
    "maternal",
    "pregnant",
    "lactating",
    "breastfeeding",
    "dietary",
    "pregnancy",
];

/// Classify a user message into a program.
///
/// Lower-cases the text and checks substring containment against the
/// keyword sets in priority order. Always produces a value; anything that
/// matches neither set (including an empty message) is General Food Access.
pub fn classify(message: &str) -> Program {
    let text = message.to_lowercase();

    if EMERGENCY_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        Program::EmergencyFoodAid
    } else if NUTRITION_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        Program::NutritionSupport
    } else {
        Program::GeneralFoodAccess
    }
}
