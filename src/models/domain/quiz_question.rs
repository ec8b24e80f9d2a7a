use std::borrow::Cow;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A single multiple-choice question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema, Validate)]
#[validate(schema(function = "validate_answer_in_options", skip_on_field_errors = false))]
pub struct Question {
    /// A unique identifier for the question, e.g. 'q1', 'q2'.
    pub question_id: String,
    /// The full text of the question.
    pub text: String,
    /// A list of 4 potential answers.
    #[validate(length(equal = 4))]
    pub options: Vec<String>,
    /// The one correct answer, which must match one of the options exactly.
    pub answer: String,
    /// A brief (1-2 sentence) explanation for why the answer is correct.
    pub explanation: String,
    /// The difficulty level of the question.
    #[validate(custom(function = "validate_difficulty"))]
    pub difficulty: Difficulty,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    // Anything else the model produced; kept so validation can report it.
    #[serde(other)]
    #[schemars(skip)]
    Unrecognized,
}

fn validate_answer_in_options(question: &Question) -> Result<(), ValidationError> {
    if question.options.iter().any(|option| option == &question.answer) {
        return Ok(());
    }

    let mut error = ValidationError::new("answer_not_in_options");
    error.message = Some(Cow::from(format!(
        "answer '{}' is not one of the options",
        question.answer
    )));
    Err(error)
}

fn validate_difficulty(difficulty: &Difficulty) -> Result<(), ValidationError> {
    match difficulty {
        Difficulty::Unrecognized => {
            let mut error = ValidationError::new("difficulty");
            error.message = Some(Cow::from("difficulty must be one of 'easy', 'medium', 'hard'"));
            Err(error)
        }
        _ => Ok(()),
    }
}
