use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{QuizDocument, QuizPayload, QuizRecord};

#[derive(Debug, Clone, Serialize)]
pub struct GenerateQuizResponse {
    pub record_id: i64,
    #[serde(flatten)]
    pub quiz: QuizDocument,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizDetailResponse {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub date_generated: DateTime<Utc>,
    pub full_quiz_data: QuizPayload,
}

impl From<QuizRecord> for QuizDetailResponse {
    fn from(record: QuizRecord) -> Self {
        let full_quiz_data = record.full_data();
        QuizDetailResponse {
            id: record.id,
            url: record.url,
            title: record.title,
            date_generated: record.date_generated,
            full_quiz_data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
