use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::complaints::models::{ComplaintRecord, NewComplaint};

/// Persistence for complaint records
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Every complaint in store-native (insertion) order
    async fn list_all(&self) -> Result<Vec<ComplaintRecord>>;

    /// Persist a complaint and return it with its assigned id
    async fn insert(&self, data: &NewComplaint) -> Result<ComplaintRecord>;
}

/// Postgres-backed complaint store
pub struct PgComplaintRepository {
    pool: PgPool,
}

impl PgComplaintRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComplaintRepository for PgComplaintRepository {
    async fn list_all(&self) -> Result<Vec<ComplaintRecord>> {
        sqlx::query_as::<_, ComplaintRecord>(
            r#"
            SELECT
                id, title, description, location, concerned_department, images,
                audio_note, approved, status, upvotes, downvotes,
                date_of_publishing, created_at
            FROM complaints
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list complaints: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn insert(&self, data: &NewComplaint) -> Result<ComplaintRecord> {
        let complaint = sqlx::query_as::<_, ComplaintRecord>(
            r#"
            INSERT INTO complaints (
                id, title, description, location, concerned_department, images,
                audio_note, approved, status, upvotes, downvotes, date_of_publishing
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING
                id, title, description, location, concerned_department, images,
                audio_note, approved, status, upvotes, downvotes,
                date_of_publishing, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.location.as_ref().map(Json))
        .bind(data.concerned_department.as_str())
        .bind(&data.images)
        .bind(&data.audio_note)
        .bind(data.approved)
        .bind(&data.status)
        .bind(data.upvotes)
        .bind(data.downvotes)
        .bind(&data.date_of_publishing)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create complaint: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(complaint)
    }
}
