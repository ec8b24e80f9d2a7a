use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// A text-generation capability: prompt in, raw model text out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> AppResult<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions model behind an OpenAI-compatible endpoint (Gemini by default).
pub struct OpenAiCompletionModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiCompletionModel {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.generation_api_base.clone())
            .with_api_key(config.generation_api_key.expose_secret().to_string());

        Self {
            client: Client::with_config(openai_config),
            model: config.generation_model.clone(),
            temperature: config.generation_temperature,
        }
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }
}

#[async_trait]
impl CompletionModel for OpenAiCompletionModel {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        log::debug!("Requesting completion from model '{}'", self.model);

        let response: ChatResponse = self.client.chat().create_byot(self.request(prompt)).await?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            AppError::GenerationFailed("model returned no choices".to_string())
        })?;

        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(AppError::GenerationFailed(format!(
                "model returned an empty message (finish reason: {})",
                choice.finish_reason.as_deref().unwrap_or("unknown")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_asks_for_a_json_object() {
        let model = OpenAiCompletionModel::new(&Config::test_config());
        let request = serde_json::to_value(model.request("Write a quiz")).unwrap();

        assert_eq!(request["model"], "gemini-2.5-flash");
        assert_eq!(request["messages"][0]["role"], "user");
        assert_eq!(request["messages"][0]["content"], "Write a quiz");
        assert_eq!(request["response_format"]["type"], "json_object");
    }

    #[test]
    fn response_without_content_deserializes() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant"},"finish_reason":"length"}]}"#,
        )
        .unwrap();

        assert_eq!(response.choices.len(), 1);
        assert!(response.choices[0].message.content.is_none());
    }
}
