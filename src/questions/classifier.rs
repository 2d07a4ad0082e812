/*!
 * Question type detection and canned answer prompts.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of question a normalized filename reads as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    YesNo,
    WhQuestion,
    UnknownType,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::YesNo => "yes_no",
            Self::WhQuestion => "wh_question",
            Self::UnknownType => "unknown_type",
        };
        write!(f, "{}", name)
    }
}

/// Opener → (positive, negative) answer, checked in order
pub const YES_NO_OPENERS: &[(&str, &str, &str)] = &[
    ("do you", "Yes, I do.", "No, I don't."),
    ("does he", "Yes, he does.", "No, he doesn't."),
    ("does she", "Yes, she does.", "No, she doesn't."),
    ("can you", "Yes, I can.", "No, I can't."),
    ("can he", "Yes, he can.", "No, he can't."),
    ("can she", "Yes, she can.", "No, she can't."),
    ("is it", "Yes, it is.", "No, it isn't."),
    ("is he", "Yes, he is.", "No, he isn't."),
    ("is she", "Yes, she is.", "No, she isn't."),
    ("are you", "Yes, I am.", "No, I'm not."),
    ("are they", "Yes, they are.", "No, they aren't."),
    ("have you", "Yes, I have.", "No, I haven't."),
    ("has he", "Yes, he has.", "No, he hasn't."),
    ("has she", "Yes, she has.", "No, she hasn't."),
    ("did you", "Yes, I did.", "No, I didn't."),
    ("would you", "Yes, I would.", "No, I wouldn't."),
    ("could you", "Yes, I could.", "No, I couldn't."),
    ("should we", "Yes, we should.", "No, we shouldn't."),
];

pub const WH_OPENERS: &[&str] = &["what", "where", "when", "why", "how", "who", "which"];

pub const WH_PROMPTS: [&str; 2] = ["[Open response]", "[Provide answer]"];
pub const UNKNOWN_PROMPTS: [&str; 2] = ["[Unknown question type]", "[Please provide appropriate responses]"];

/// Classify a question by its opening words
///
/// Matching is a case-insensitive prefix test; the first table row that
/// matches decides the type and the two answer prompts.
pub fn classify(question: &str) -> (QuestionType, [String; 2]) {
    let lowered = question.trim().to_lowercase();

    if let Some((_, positive, negative)) = YES_NO_OPENERS
        .iter()
        .find(|(opener, _, _)| lowered.starts_with(opener))
    {
        return (QuestionType::YesNo, [positive.to_string(), negative.to_string()]);
    }

    if WH_OPENERS.iter().any(|opener| lowered.starts_with(opener)) {
        return (QuestionType::WhQuestion, WH_PROMPTS.map(String::from));
    }

    (QuestionType::UnknownType, UNKNOWN_PROMPTS.map(String::from))
}
