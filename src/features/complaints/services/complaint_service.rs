use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::error::Result;
use crate::features::complaints::dtos::{ComplaintDto, CreateComplaintDto, UploadedFile};
use crate::features::complaints::repositories::ComplaintRepository;
use crate::modules::storage::{LocalDiskStorage, StoredFile};

/// Service for complaint operations
pub struct ComplaintService {
    repository: Arc<dyn ComplaintRepository>,
    storage: Arc<LocalDiskStorage>,
}

impl ComplaintService {
    pub fn new(repository: Arc<dyn ComplaintRepository>, storage: Arc<LocalDiskStorage>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    /// Largest accepted image, in bytes
    pub fn max_file_size(&self) -> usize {
        self.storage.max_file_size()
    }

    /// List every complaint, store-native order
    pub async fn list(&self) -> Result<Vec<ComplaintDto>> {
        let records = self.repository.list_all().await?;
        debug!("Listing {} complaints", records.len());
        records.into_iter().map(ComplaintDto::try_from).collect()
    }

    /// Store the uploaded images, then persist the complaint pointing at them.
    ///
    /// # Arguments
    /// * `dto` - Validated complaint fields
    /// * `files` - Image parts in submission order
    /// * `origin` - `scheme://host` the image URLs are rooted at
    ///
    /// If anything fails after files were written they are removed again.
    pub async fn create(
        &self,
        dto: CreateComplaintDto,
        files: Vec<UploadedFile>,
        origin: &str,
    ) -> Result<ComplaintDto> {
        let mut stored: Vec<StoredFile> = Vec::with_capacity(files.len());
        for file in &files {
            match self.storage.store(&file.original_name, &file.data).await {
                Ok(s) => {
                    debug!(
                        "Stored image {} ({} bytes, {})",
                        s.file_name,
                        s.size,
                        file.content_type.as_deref().unwrap_or("unknown type")
                    );
                    stored.push(s);
                }
                Err(e) => {
                    self.storage.remove_all(&stored).await;
                    return Err(e);
                }
            }
        }

        let images: Vec<String> = stored
            .iter()
            .map(|s| LocalDiskStorage::public_url(origin, &s.file_name))
            .collect();

        let new_complaint = dto.into_new_complaint(images);

        let record = match self.repository.insert(&new_complaint).await {
            Ok(record) => record,
            Err(e) => {
                if !stored.is_empty() {
                    warn!(
                        "Complaint not persisted, removing {} uploaded file(s)",
                        stored.len()
                    );
                    self.storage.remove_all(&stored).await;
                }
                return Err(e);
            }
        };

        info!(
            "Complaint {} filed for {} with {} image(s), {} bytes",
            record.id,
            record.concerned_department,
            record.images.len(),
            stored.iter().map(|s| s.size).sum::<usize>()
        );

        ComplaintDto::try_from(record)
    }
}
