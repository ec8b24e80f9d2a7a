use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    error::{ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{NewQuizRecord, QuizRecord, QuizSummary},
};

const COUNTERS_COLLECTION: &str = "counters";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Persistence for generated quizzes. Records are insert-only and unique per URL.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Inserts a new record. A second record for the same URL fails with
    /// [`AppError::AlreadyExists`] and leaves the first one untouched.
    async fn save(&self, record: NewQuizRecord) -> AppResult<QuizRecord>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<QuizRecord>>;
    /// All records, newest first, without their quiz bodies.
    async fn list_recent(&self) -> AppResult<Vec<QuizSummary>>;
    /// Fails when the backing store cannot be reached.
    async fn health_check(&self) -> AppResult<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuizRecordDocument {
    id: i64,
    url: String,
    title: String,
    date_generated: bson::DateTime,
    scraped_content: Option<String>,
    full_quiz_data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuizSummaryDocument {
    id: i64,
    url: String,
    title: String,
    date_generated: bson::DateTime,
}

impl From<QuizRecordDocument> for QuizRecord {
    fn from(document: QuizRecordDocument) -> Self {
        QuizRecord {
            id: document.id,
            url: document.url,
            title: document.title,
            date_generated: to_chrono(document.date_generated),
            scraped_content: document.scraped_content,
            full_quiz_data: document.full_quiz_data,
        }
    }
}

impl From<QuizSummaryDocument> for QuizSummary {
    fn from(document: QuizSummaryDocument) -> Self {
        QuizSummary {
            id: document.id,
            url: document.url,
            title: document.title,
            date_generated: to_chrono(document.date_generated),
        }
    }
}

fn to_chrono(value: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

/// Newest first with the id as tie-break, projected down to summary fields.
fn recent_first_options() -> FindOptions {
    FindOptions::builder()
        .sort(doc! { "date_generated": -1, "id": -1 })
        .projection(doc! { "id": 1, "url": 1, "title": 1, "date_generated": 1 })
        .build()
}

pub struct MongoQuizRepository {
    db: Database,
    collection: Collection<QuizRecordDocument>,
    counters: Collection<Document>,
    counter_key: String,
}

impl MongoQuizRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            db: db.clone(),
            collection: db.get_collection(collection_name),
            counters: db.get_collection(COUNTERS_COLLECTION),
            counter_key: collection_name.to_string(),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!(
            "Creating indexes for '{}' in database '{}'",
            self.counter_key,
            self.db.db_name()
        );

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let url_index = IndexModel::builder()
            .keys(doc! { "url": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("url_unique".to_string())
                    .build(),
            )
            .build();

        let date_index = IndexModel::builder()
            .keys(doc! { "date_generated": -1 })
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(url_index).await?;
        self.collection.create_index(date_index).await?;

        log::info!("Successfully created indexes for quiz history collection");
        Ok(())
    }

    async fn next_id(&self) -> AppResult<i64> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self
            .counters
            .find_one_and_update(
                doc! { "_id": self.counter_key.as_str() },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .with_options(options)
            .await?
            .ok_or_else(|| AppError::DatabaseError("id counter was not created".to_string()))?;

        counter
            .get_i64("seq")
            .map_err(|e| AppError::DatabaseError(format!("Malformed id counter: {}", e)))
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn save(&self, record: NewQuizRecord) -> AppResult<QuizRecord> {
        let id = self.next_id().await?;
        let document = QuizRecordDocument {
            id,
            url: record.url,
            title: record.title,
            date_generated: bson::DateTime::from_millis(Utc::now().timestamp_millis()),
            scraped_content: record.scraped_content,
            full_quiz_data: record.full_quiz_data,
        };

        match self.collection.insert_one(&document).await {
            Ok(_) => {
                log::info!("Saved quiz {} for {}", document.id, document.url);
                Ok(document.into())
            }
            Err(err) if is_duplicate_key(&err) => Err(AppError::AlreadyExists(format!(
                "A quiz for '{}' already exists",
                document.url
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<QuizRecord>> {
        let document = self.collection.find_one(doc! { "id": id }).await?;
        Ok(document.map(QuizRecord::from))
    }

    async fn list_recent(&self) -> AppResult<Vec<QuizSummary>> {
        let cursor = self
            .collection
            .clone_with_type::<QuizSummaryDocument>()
            .find(doc! {})
            .with_options(recent_first_options())
            .await?;
        let items: Vec<QuizSummaryDocument> = cursor.try_collect().await?;

        Ok(items.into_iter().map(QuizSummary::from).collect())
    }

    async fn health_check(&self) -> AppResult<()> {
        self.db.health_check().await
    }
}
