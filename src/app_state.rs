use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::MongoQuizRepository,
    services::{
        extractor_service::WikipediaExtractor, model_service::OpenAiCompletionModel,
        quiz_generator_service::LlmQuizGenerator, quiz_service::QuizService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db, &config.quiz_collection));
        quiz_repository.ensure_indexes().await?;

        let extractor = Arc::new(WikipediaExtractor::new(config.fetch_timeout())?);
        let model = Arc::new(OpenAiCompletionModel::new(&config));
        let generator = Arc::new(LlmQuizGenerator::new(model, config.generation_timeout())?);

        let quiz_service = Arc::new(QuizService::new(
            extractor,
            generator,
            quiz_repository,
            config.max_article_chars,
        ));

        Ok(Self::from_service(quiz_service))
    }

    pub fn from_service(quiz_service: Arc<QuizService>) -> Self {
        Self { quiz_service }
    }
}
