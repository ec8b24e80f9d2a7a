use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{NewQuizRecord, QuizRecord, QuizSummary},
        dto::response::GenerateQuizResponse,
    },
    repositories::QuizRepository,
    services::{extractor_service::ArticleSource, quiz_generator_service::QuizGenerator},
};

/// Runs fetch → clean → generate → persist for one URL and serves stored quizzes.
pub struct QuizService {
    source: Arc<dyn ArticleSource>,
    generator: Arc<dyn QuizGenerator>,
    repository: Arc<dyn QuizRepository>,
    max_article_chars: usize,
}

impl QuizService {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        generator: Arc<dyn QuizGenerator>,
        repository: Arc<dyn QuizRepository>,
        max_article_chars: usize,
    ) -> Self {
        Self {
            source,
            generator,
            repository,
            max_article_chars,
        }
    }

    pub async fn generate_quiz(&self, url: &str) -> AppResult<GenerateQuizResponse> {
        let page = self.source.extract(url).await?;
        if !page.has_body() {
            return Err(AppError::NoMainContent {
                reason: format!("no article text could be extracted from '{}'", url),
                disambiguation: false,
            });
        }

        let article_text = truncate_chars(&page.body, self.max_article_chars);
        log::info!("Scraping successful. Generating quiz for '{}'", page.title);

        let quiz = self.generator.generate(article_text).await?;

        let record = NewQuizRecord::new(url, &page.title, Some(article_text.to_string()), &quiz)?;
        let saved = self.repository.save(record).await?;
        log::info!("Saved new quiz with id {}", saved.id);

        Ok(GenerateQuizResponse {
            record_id: saved.id,
            quiz,
        })
    }

    pub async fn get_quiz(&self, id: i64) -> AppResult<QuizRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }

    pub async fn list_history(&self) -> AppResult<Vec<QuizSummary>> {
        self.repository.list_recent().await
    }

    pub async fn check_ready(&self) -> AppResult<()> {
        self.repository.health_check().await
    }
}

/// The first `max_chars` characters of `text`, cut on a character boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
