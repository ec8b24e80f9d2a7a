use std::env;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

pub const DEFAULT_GENERATION_API_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_MAX_ARTICLE_CHARS: usize = 15_000;

const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "https://ai-quiz-project.vercel.app",
];

#[derive(Clone, Debug)]
pub struct Config {
    pub generation_api_key: SecretString,
    pub generation_api_base: String,
    pub generation_model: String,
    pub generation_temperature: f32,
    pub generation_timeout_secs: u64,
    pub database_url: String,
    pub database_name: String,
    pub quiz_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub max_article_chars: usize,
    pub fetch_timeout_secs: u64,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            generation_api_key: SecretString::from(
                env::var("GEMINI_API_KEY").unwrap_or_default(),
            ),
            generation_api_base: env::var("GENERATION_API_BASE")
                .unwrap_or_else(|_| DEFAULT_GENERATION_API_BASE.to_string()),
            generation_model: env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_MODEL.to_string()),
            generation_temperature: parse_env("GENERATION_TEMPERATURE").unwrap_or(0.3),
            generation_timeout_secs: parse_env("GENERATION_TIMEOUT_SECS").unwrap_or(120),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "quiz-generator".to_string()),
            quiz_collection: env::var("QUIZ_COLLECTION")
                .unwrap_or_else(|_| "quiz_history".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: parse_env("WEB_SERVER_PORT").unwrap_or(8000),
            max_article_chars: parse_env("MAX_ARTICLE_CHARS")
                .unwrap_or(DEFAULT_MAX_ARTICLE_CHARS),
            fetch_timeout_secs: parse_env("FETCH_TIMEOUT_SECS").unwrap_or(10),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|origins| split_origins(&origins))
                .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()),
        }
    }

    /// Rejects configurations the server cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.generation_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::InternalError(
                "GEMINI_API_KEY is not set; the quiz generator cannot authenticate".to_string(),
            ));
        }

        if self.max_article_chars == 0 {
            return Err(AppError::InternalError(
                "MAX_ARTICLE_CHARS must be greater than zero".to_string(),
            ));
        }

        if self.fetch_timeout_secs == 0 || self.generation_timeout_secs == 0 {
            return Err(AppError::InternalError(
                "FETCH_TIMEOUT_SECS and GENERATION_TIMEOUT_SECS must be greater than zero"
                    .to_string(),
            ));
        }

        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            generation_api_key: SecretString::from("test_api_key".to_string()),
            generation_api_base: "http://127.0.0.1:9/v1".to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            generation_temperature: 0.3,
            generation_timeout_secs: 5,
            database_url: "mongodb://localhost:27017".to_string(),
            database_name: "quiz-generator-test".to_string(),
            quiz_collection: "quiz_history".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8000,
            max_article_chars: DEFAULT_MAX_ARTICLE_CHARS,
            fetch_timeout_secs: 2,
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}

fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.to_string())
        .collect()
}
