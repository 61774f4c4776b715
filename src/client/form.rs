use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use validator::Validate;

use crate::client::audio::AudioRecorder;
use crate::features::complaints::dtos::CreateComplaintDto;
use crate::features::complaints::models::{Department, Location};
use crate::shared::constants::DEFAULT_STATUS;

/// Problems caught before a complaint leaves the client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),
}

/// An image picked for upload
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ImageAttachment {
    /// Read an image from disk, guessing its content type from the extension
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let content_type = match extension.as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("heic") => "image/heic",
            _ => "application/octet-stream",
        };

        Ok(Self {
            file_name,
            content_type: content_type.to_string(),
            data,
        })
    }
}

/// Draft of a complaint being authored
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplaintForm {
    pub title: String,
    pub description: String,
    pub department: Option<Department>,
    pub images: Vec<ImageAttachment>,
    pub location: Option<Location>,
    pub audio_note: Option<String>,
}

/// A validated complaint ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub complaint: CreateComplaintDto,
    pub images: Vec<ImageAttachment>,
}

impl ComplaintForm {
    /// Record the device position together with its geohash
    pub fn capture_location(&mut self, latitude: f64, longitude: f64) -> Result<(), FormError> {
        // NaN slips through range checks and serializes as null
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(FormError::InvalidLocation(format!(
                "coordinates must be finite numbers, got {}, {}",
                latitude, longitude
            )));
        }

        let location = Location::from_coordinates(latitude, longitude);
        location
            .validate()
            .map_err(|e| FormError::InvalidLocation(e.to_string()))?;

        tracing::debug!(
            "Captured location {}, {} ({})",
            latitude,
            longitude,
            location.geohash
        );
        self.location = Some(location);
        Ok(())
    }

    pub fn attach_image(&mut self, image: ImageAttachment) {
        self.images.push(image);
    }

    /// Take the recorder's local URL as the audio note; a recorder with nothing recorded clears it
    pub fn attach_audio(&mut self, recorder: &AudioRecorder) {
        self.audio_note = recorder.url().map(str::to_string);
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::Missing("title"));
        }
        if self.description.trim().is_empty() {
            return Err(FormError::Missing("description"));
        }
        if self.department.is_none() {
            return Err(FormError::Missing("concerned_department"));
        }
        Ok(())
    }

    /// Build the outgoing submission, stamped with `now` as its publish date
    pub fn to_submission(&self, now: DateTime<Utc>) -> Result<Submission, FormError> {
        self.validate()?;
        let concerned_department = self
            .department
            .ok_or(FormError::Missing("concerned_department"))?;

        let complaint = CreateComplaintDto {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            concerned_department,
            location: self.location.clone(),
            audio_note: self.audio_note.clone().filter(|a| !a.is_empty()),
            approved: None,
            status: Some(DEFAULT_STATUS.to_string()),
            upvotes: Some(0),
            downvotes: Some(0),
            date_of_publishing: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        };

        Ok(Submission {
            complaint,
            images: self.images.clone(),
        })
    }
}
