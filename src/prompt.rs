//! Prompt construction for a mood reflection request.
//!
//! A request carries two pieces of text: a fixed persona instruction sent as
//! Gemini's `systemInstruction`, and a user instruction that interpolates
//! the mood text. [`RequestPayload`] serialises directly to the
//! `generateContent` request body.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Persona instruction establishing the assistant role and the three-way
/// intensity classification (Positive, Negative, Neutral).
pub const PERSONA_INSTRUCTION: &str = "You are a kind and empathetic mood journal assistant \
who helps users reflect on their emotions positively. Analyze the emotion and respond with its \
mood intensity (Positive, Negative, or Neutral) and give a thoughtful, short reflection in a \
single paragraph.";

/// Build the per-call user instruction for `mood`.
pub fn user_instruction(mood: &str) -> String {
    format!(
        "I am feeling {}. Please classify the mood intensity and give a short, empathetic reflection.",
        mood
    )
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A single text part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextPart {
    pub text: String,
}

/// A content block made of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
    pub parts: Vec<TextPart>,
}

impl Content {
    fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![TextPart { text: text.into() }],
        }
    }
}

/// The immutable request body for one dispatch call.
///
/// Serialises as
/// `{ "contents": [{ "parts": [{ "text": .. }] }], "systemInstruction": { "parts": [{ "text": .. }] } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPayload {
    contents: Vec<Content>,
    system_instruction: Content,
}

impl RequestPayload {
    /// Build the payload for `mood` from the fixed templates.
    pub fn for_mood(mood: &str) -> Self {
        Self {
            contents: vec![Content::text(user_instruction(mood))],
            system_instruction: Content::text(PERSONA_INSTRUCTION),
        }
    }

    /// The user instruction text.
    pub fn user_text(&self) -> &str {
        self.contents
            .first()
            .and_then(|c| c.parts.first())
            .map(|p| p.text.as_str())
            .unwrap_or_default()
    }

    /// The persona instruction text.
    pub fn system_text(&self) -> &str {
        self.system_instruction
            .parts
            .first()
            .map(|p| p.text.as_str())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_instruction_interpolates_mood() {
        let text = user_instruction("anxious about tomorrow");
        assert!(text.starts_with("I am feeling anxious about tomorrow."));
        assert!(text.contains("classify the mood intensity"));
    }

    #[test]
    fn test_persona_names_all_intensities() {
        for label in ["Positive", "Negative", "Neutral"] {
            assert!(PERSONA_INSTRUCTION.contains(label), "missing {}", label);
        }
    }

    #[test]
    fn test_payload_wire_shape() {
        let payload = RequestPayload::for_mood("happy");
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "contents": [{ "parts": [{ "text": user_instruction("happy") }] }],
                "systemInstruction": { "parts": [{ "text": PERSONA_INSTRUCTION }] }
            })
        );
    }

    #[test]
    fn test_payload_accessors() {
        let payload = RequestPayload::for_mood("tired");
        assert_eq!(payload.user_text(), user_instruction("tired"));
        assert_eq!(payload.system_text(), PERSONA_INSTRUCTION);
    }
}
