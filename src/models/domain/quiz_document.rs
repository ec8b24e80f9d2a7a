use std::borrow::Cow;
use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::quiz_question::Question;

/// The complete quiz structure the generation model is asked to produce.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema, Validate)]
#[validate(schema(function = "validate_unique_question_ids", skip_on_field_errors = false))]
pub struct QuizDocument {
    /// A unique id for the quiz, e.g. 1, 2, ...
    pub id: i64,
    /// A title for the quiz, like 'Python Programming Language'.
    pub title: String,
    /// A short paragraph summarising the topic.
    pub summary: String,
    /// A list of 3-5 key topics, names, or entities from the provided text.
    #[validate(length(min = 3, max = 5))]
    pub key_entities: Vec<String>,
    /// A list of 2-3 organizations from the provided text.
    #[validate(length(min = 2, max = 3))]
    pub organizations: Vec<String>,
    /// The locations the information relates to.
    pub locations: Vec<String>,
    /// A list of 2-3 sections from the provided text.
    #[validate(length(min = 2, max = 3))]
    pub sections: Vec<String>,
    /// A list of 3-5 related Wikipedia topics or concepts for further reading.
    #[validate(length(min = 3, max = 5))]
    pub suggested_topics: Vec<String>,
    /// A list of 5-10 multiple-choice questions based on the text.
    #[validate(length(min = 5, max = 10))]
    pub quiz: Vec<Question>,
}

fn validate_unique_question_ids(document: &QuizDocument) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    let duplicates: Vec<&str> = document
        .quiz
        .iter()
        .map(|q| q.question_id.as_str())
        .filter(|id| !seen.insert(*id))
        .collect();

    if duplicates.is_empty() {
        return Ok(());
    }

    let mut error = ValidationError::new("duplicate_question_id");
    error.message = Some(Cow::from(format!(
        "question ids must be unique, repeated: {}",
        duplicates.join(", ")
    )));
    Err(error)
}
