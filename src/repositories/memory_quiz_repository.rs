use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{NewQuizRecord, QuizRecord, QuizSummary},
    repositories::QuizRepository,
};

/// Process-local store with the same guarantees the MongoDB indexes give: unique ids, one
/// record per URL, newest-first listing.
pub struct InMemoryQuizRepository {
    records: RwLock<Vec<QuizRecord>>,
    available: AtomicBool,
}

impl Default for InMemoryQuizRepository {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record as given, without id or timestamp assignment.
    pub async fn insert_raw(&self, record: QuizRecord) {
        self.records.write().await.push(record);
    }

    /// Makes `health_check` report the store as unreachable.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn save(&self, record: NewQuizRecord) -> AppResult<QuizRecord> {
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.url == record.url) {
            return Err(AppError::AlreadyExists(format!(
                "A quiz for '{}' already exists",
                record.url
            )));
        }

        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        // Timestamps strictly increase so listing order matches insertion order.
        let now = Utc::now();
        let date_generated = match records.iter().map(|r| r.date_generated).max() {
            Some(latest) if latest >= now => latest + Duration::milliseconds(1),
            _ => now,
        };

        let saved = record.into_record(id, date_generated);
        records.push(saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<QuizRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn list_recent(&self) -> AppResult<Vec<QuizSummary>> {
        let records = self.records.read().await;
        let mut summaries: Vec<QuizSummary> = records.iter().map(QuizRecord::summary).collect();
        summaries.sort_by(|a, b| {
            b.date_generated
                .cmp(&a.date_generated)
                .then(b.id.cmp(&a.id))
        });
        Ok(summaries)
    }

    async fn health_check(&self) -> AppResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::DatabaseError("in-memory store marked unavailable".to_string()))
        }
    }
}
