//! Reply templates — clarification questions and the completion message.

use super::state::{IntakeField, Program};

/// The clarification question for one missing field.
pub fn clarification_question(field: IntakeField, program: Program) -> String {
    match field {
        IntakeField::Name => format!(
            "Thank you for reaching out to the {}. To assist you better, \
             may I please have your name?",
            program.display_name()
        ),
        IntakeField::Age => "Could you please share your age? This helps us provide \
             appropriate assistance."
            .to_string(),
        IntakeField::AssistanceRequest => "Please tell me more about your food assistance \
             needs. What specific help are you looking for?"
            .to_string(),
    }
}

/// The completion message once every field has been collected.
pub fn completion_message(program: Program) -> String {
    format!(
        "Thank you for providing all the necessary information. I've registered \
         your request with the {}. Your information has been submitted and our \
         team will contact you shortly to assist you further.",
        program.display_name()
    )
}
