use crate::core::error::{AppError, Result};
use crate::features::complaints::models::{ComplaintRecord, NewComplaint};
use crate::features::complaints::repositories::ComplaintRepository;
use async_trait::async_trait;
use std::sync::Mutex;

/// Complaint store kept in memory, insertion ordered
#[derive(Default)]
pub struct InMemoryComplaintRepository {
    records: Mutex<Vec<ComplaintRecord>>,
}

#[async_trait]
impl ComplaintRepository for InMemoryComplaintRepository {
    async fn list_all(&self) -> Result<Vec<ComplaintRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn insert(&self, data: &NewComplaint) -> Result<ComplaintRecord> {
        let record = ComplaintRecord {
            id: uuid::Uuid::now_v7(),
            title: data.title.clone(),
            description: data.description.clone(),
            location: data.location.clone().map(sqlx::types::Json),
            concerned_department: data.concerned_department.to_string(),
            images: data.images.clone(),
            audio_note: data.audio_note.clone(),
            approved: data.approved,
            status: data.status.clone(),
            upvotes: data.upvotes,
            downvotes: data.downvotes,
            date_of_publishing: data.date_of_publishing.clone(),
            created_at: chrono::Utc::now(),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }
}

/// Store that is always unavailable
pub struct FailingComplaintRepository;

#[async_trait]
impl ComplaintRepository for FailingComplaintRepository {
    async fn list_all(&self) -> Result<Vec<ComplaintRecord>> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn insert(&self, _data: &NewComplaint) -> Result<ComplaintRecord> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
}
