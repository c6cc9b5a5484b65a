//! Regex field extraction — opportunistically fills beneficiary details
//! from free-text messages.

use regex::Regex;

use super::state::ConversationState;

/// Messages at or under this length are never treated as an assistance
/// request.
const REQUEST_MIN_LEN: usize = 15;

/// Ordered extraction patterns for the three beneficiary fields.
///
/// Patterns are tried in order; the first match wins. A field that is
/// already set is never touched again, even if a later message matches.
pub struct FieldExtractor {
    name_patterns: Vec<Regex>,
    age_patterns: Vec<Regex>,
    /// Anchored prefixes that mark a message as a bare name/age answer,
    /// which must not be captured as the assistance request.
    name_age_prefixes: Vec<Regex>,
}

impl FieldExtractor {
    pub fn new() -> Self {
        let name_patterns = vec![
            Regex::new(r"(?i)my name is ([A-Za-z\s]+)").unwrap(),
            Regex::new(r"(?i)i['’]?m ([A-Za-z\s]+)").unwrap(),
            Regex::new(r"(?i)name is ([A-Za-z\s]+)").unwrap(),
            Regex::new(r"(?i)i am ([A-Za-z\s]+)").unwrap(),
        ];

        let age_patterns = vec![
            Regex::new(r"(?i)i['’]?m (\d+) years? old").unwrap(),
            Regex::new(r"(?i)age is (\d+)").unwrap(),
            Regex::new(r"(?i)(\d+) years? old").unwrap(),
            Regex::new(r"(?i)aged (\d+)").unwrap(),
        ];

        let name_age_prefixes = vec![
            Regex::new(r"^(my name is|i['’]?m|i am|name is)").unwrap(),
            Regex::new(r"^(age is|i['’]?m \d+|aged \d+)").unwrap(),
            Regex::new(r"^\d+$").unwrap(),
        ];

        Self {
            name_patterns,
            age_patterns,
            name_age_prefixes,
        }
    }

    /// Extract beneficiary details from `message` into `state`.
    ///
    /// `capture_request` is false on the routing turn: the message that
    /// selects the program is consumed by classification and is never
    /// stored as the assistance request.
    pub fn extract_into(
        &self,
        state: &mut ConversationState,
        message: &str,
        capture_request: bool,
    ) {
        if state.beneficiary_name.is_none() {
            for pattern in &self.name_patterns {
                if let Some(caps) = pattern.captures(message) {
                    let name = caps[1].trim();
                    // An all-whitespace capture counts as no match.
                    if !name.is_empty() {
                        state.beneficiary_name = Some(name.to_string());
                        break;
                    }
                }
            }
        }

        if state.beneficiary_age.is_none() {
            for pattern in &self.age_patterns {
                if let Some(caps) = pattern.captures(message) {
                    // Parse failures (overflow) leave the field unset.
                    if let Ok(age) = caps[1].parse::<u32>() {
                        state.beneficiary_age = Some(age);
                        break;
                    }
                }
            }
        }

        if capture_request && state.assistance_request.is_none() {
            let lowered = message.to_lowercase();
            let is_name_or_age = self
                .name_age_prefixes
                .iter()
                .any(|p| p.is_match(&lowered));

            let trimmed = message.trim();
            if !is_name_or_age && trimmed.len() > REQUEST_MIN_LEN {
                state.assistance_request = Some(trimmed.to_string());
            }
        }
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}
