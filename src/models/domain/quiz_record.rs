use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::models::domain::quiz_document::QuizDocument;

pub const DEFAULT_TITLE: &str = "Untitled Quiz";
pub const CORRUPTED_DATA_MESSAGE: &str = "Invalid JSON data in database";

/// A generated quiz as persisted, with where it came from.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizRecord {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub date_generated: DateTime<Utc>,
    pub scraped_content: Option<String>,
    pub full_quiz_data: String,
}

/// Everything needed to insert a record; the store assigns id and timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewQuizRecord {
    pub url: String,
    pub title: String,
    pub scraped_content: Option<String>,
    pub full_quiz_data: String,
}

/// Listing projection, without the quiz body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizSummary {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub date_generated: DateTime<Utc>,
}

/// The stored quiz blob after deserialization. A blob that no longer parses is reported
/// through the `error` marker instead of failing the read.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum QuizPayload {
    Quiz(QuizDocument),
    Corrupted { error: String },
}

impl QuizPayload {
    pub fn is_corrupted(&self) -> bool {
        matches!(self, QuizPayload::Corrupted { .. })
    }
}

impl NewQuizRecord {
    pub fn new(
        url: &str,
        title: &str,
        scraped_content: Option<String>,
        quiz: &QuizDocument,
    ) -> AppResult<Self> {
        let title = title.trim();
        Ok(NewQuizRecord {
            url: url.to_string(),
            title: if title.is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                title.to_string()
            },
            scraped_content,
            full_quiz_data: serde_json::to_string(quiz)?,
        })
    }

    pub fn into_record(self, id: i64, date_generated: DateTime<Utc>) -> QuizRecord {
        QuizRecord {
            id,
            url: self.url,
            title: self.title,
            date_generated,
            scraped_content: self.scraped_content,
            full_quiz_data: self.full_quiz_data,
        }
    }
}

impl QuizRecord {
    pub fn full_data(&self) -> QuizPayload {
        match serde_json::from_str::<QuizDocument>(&self.full_quiz_data) {
            Ok(document) => QuizPayload::Quiz(document),
            Err(err) => {
                log::warn!("Quiz record {} has unreadable quiz data: {}", self.id, err);
                QuizPayload::Corrupted {
                    error: CORRUPTED_DATA_MESSAGE.to_string(),
                }
            }
        }
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            id: self.id,
            url: self.url.clone(),
            title: self.title.clone(),
            date_generated: self.date_generated,
        }
    }
}
