//! Local disk storage for complaint media
//!
//! Files are written once under `<timestamp>-<sanitized original name>` and
//! served back as static files under `/uploads`.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::error::AppError;
use crate::shared::constants::UPLOADS_ROUTE;
use crate::shared::validation::sanitize_file_name;

/// How many successive timestamps are tried before giving up on a free name
const MAX_NAME_ATTEMPTS: i64 = 16;

/// A file written to the upload directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Name inside the upload directory, also the last URL segment
    pub file_name: String,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct LocalDiskStorage {
    base_path: PathBuf,
    max_file_size: usize,
}

impl LocalDiskStorage {
    /// Open the upload directory, creating it if needed
    pub async fn new(base_path: PathBuf, max_file_size: usize) -> Result<Self, AppError> {
        fs::create_dir_all(&base_path).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to create upload directory '{}': {}",
                base_path.display(),
                e
            ))
        })?;

        info!(path = %base_path.display(), "Upload storage initialized");

        Ok(Self {
            base_path,
            max_file_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Public URL for a stored file
    pub fn public_url(origin: &str, file_name: &str) -> String {
        format!(
            "{}{}/{}",
            origin.trim_end_matches('/'),
            UPLOADS_ROUTE,
            file_name
        )
    }

    /// Write `data` under a fresh `<unix-millis>-<name>` file name.
    ///
    /// Never overwrites: if the name is taken the next millisecond is tried.
    pub async fn store(&self, original_name: &str, data: &[u8]) -> Result<StoredFile, AppError> {
        if data.len() > self.max_file_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File '{}' is {} bytes, maximum is {} bytes",
                original_name,
                data.len(),
                self.max_file_size
            )));
        }

        let safe_name = sanitize_file_name(original_name);
        let timestamp = Utc::now().timestamp_millis();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = format!("{}-{}", timestamp + attempt, safe_name);
            let path = self.path_for(&file_name)?;

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("Upload name {} taken, trying next timestamp", file_name);
                    continue;
                }
                Err(e) => {
                    return Err(AppError::Storage(format!(
                        "Failed to create '{}': {}",
                        file_name, e
                    )))
                }
            };

            if let Err(e) = write_all(&mut file, data).await {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(AppError::Storage(format!(
                    "Failed to write '{}': {}",
                    file_name, e
                )));
            }

            return Ok(StoredFile {
                file_name,
                size: data.len(),
            });
        }

        Err(AppError::Storage(format!(
            "No free upload name for '{}' after {} attempts",
            safe_name, MAX_NAME_ATTEMPTS
        )))
    }

    /// Delete a stored file. Missing files are not an error.
    pub async fn remove(&self, file_name: &str) -> Result<(), AppError> {
        let path = self.path_for(file_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to delete '{}': {}",
                file_name, e
            ))),
        }
    }

    /// Best-effort removal of files whose complaint was never persisted
    pub async fn remove_all(&self, files: &[StoredFile]) {
        for file in files {
            if let Err(e) = self.remove(&file.file_name).await {
                warn!("Orphaned upload left behind: {}", e);
            }
        }
    }

    /// Resolve a stored name to a path, refusing anything but a single plain component
    fn path_for(&self, file_name: &str) -> Result<PathBuf, AppError> {
        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.base_path.join(file_name)),
            _ => Err(AppError::BadRequest(format!(
                "Invalid upload file name '{}'",
                file_name
            ))),
        }
    }
}

async fn write_all(file: &mut fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.flush().await
}
