use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::quiz_prompt::{
    ARTICLE_TEXT_PLACEHOLDER, FORMAT_INSTRUCTIONS_PLACEHOLDER, FORMAT_INSTRUCTIONS_PREAMBLE,
    QUIZ_GENERATION_PROMPT,
};
use crate::errors::{AppError, AppResult};
use crate::models::domain::QuizDocument;
use crate::models::validation::validate_quiz;
use crate::services::model_service::CompletionModel;

static CODE_FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*\s*\n(.*?)\n?\s*```\s*$")
        .expect("CODE_FENCE_REGEX is a valid regex pattern")
});

/// Turns article text into a validated quiz.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    async fn generate(&self, article_text: &str) -> AppResult<QuizDocument>;
}

/// Prompts a [`CompletionModel`] once and holds its answer to the quiz schema.
pub struct LlmQuizGenerator {
    model: Arc<dyn CompletionModel>,
    timeout: Duration,
    format_instructions: String,
}

impl LlmQuizGenerator {
    pub fn new(model: Arc<dyn CompletionModel>, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            model,
            timeout,
            format_instructions: format_instructions()?,
        })
    }

    pub fn prompt(&self, article_text: &str) -> String {
        QUIZ_GENERATION_PROMPT
            .replace(FORMAT_INSTRUCTIONS_PLACEHOLDER, &self.format_instructions)
            .replace(ARTICLE_TEXT_PLACEHOLDER, article_text)
    }

    /// Same contract as [`QuizGenerator::generate`] for callers without an async runtime.
    ///
    /// Drives the request on a private current-thread runtime. Calling it from inside an
    /// async context is rejected with [`AppError::InternalError`].
    pub fn generate_blocking(&self, article_text: &str) -> AppResult<QuizDocument> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(AppError::InternalError(
                "generate_blocking cannot be called from inside an async runtime".to_string(),
            ));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to start runtime: {}", e)))?;

        runtime.block_on(self.generate(article_text))
    }
}

#[async_trait]
impl QuizGenerator for LlmQuizGenerator {
    async fn generate(&self, article_text: &str) -> AppResult<QuizDocument> {
        let prompt = self.prompt(article_text);

        let raw = tokio::time::timeout(self.timeout, self.model.complete(&prompt))
            .await
            .map_err(|_| {
                AppError::GenerationFailed(format!(
                    "model did not answer within {}s",
                    self.timeout.as_secs_f32()
                ))
            })??;

        let document = parse_quiz_response(&raw)?;
        log::info!(
            "Generated quiz '{}' with {} questions",
            document.title,
            document.quiz.len()
        );
        Ok(document)
    }
}

/// JSON Schema of [`QuizDocument`] with a short preamble, embedded in the prompt.
pub fn format_instructions() -> AppResult<String> {
    let schema = serde_json::to_string_pretty(&schemars::schema_for!(QuizDocument))?;
    Ok(format!("{}\n```json\n{}\n```", FORMAT_INSTRUCTIONS_PREAMBLE, schema))
}

/// Parses raw model output, then checks it against the quiz schema.
pub fn parse_quiz_response(raw: &str) -> AppResult<QuizDocument> {
    let json = strip_code_fence(raw);

    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
        log::warn!("Model response is not JSON: {}", e);
        AppError::GenerationFailed(format!("model response is not valid JSON: {}", e))
    })?;

    validate_quiz(value).map_err(|failure| {
        log::warn!("Generated quiz rejected: {}", failure);
        AppError::SchemaViolation(failure)
    })
}

fn strip_code_fence(raw: &str) -> &str {
    match CODE_FENCE_REGEX.captures(raw).and_then(|c| c.get(1)) {
        Some(body) => body.as_str(),
        None => raw.trim(),
    }
}
