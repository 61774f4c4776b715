use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, FromRef, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{PublicOrigin, RequestOrigin};
use crate::features::complaints::dtos::{
    ComplaintDto, ComplaintFormFields, CreateComplaintForm, UploadedFile,
};
use crate::features::complaints::services::ComplaintService;
use crate::shared::constants::IMAGES_FIELD;
use crate::shared::types::ErrorResponse;

/// State for complaint handlers
#[derive(Clone)]
pub struct ComplaintState {
    pub service: Arc<ComplaintService>,
    pub origin: PublicOrigin,
}

impl FromRef<ComplaintState> for PublicOrigin {
    fn from_ref(state: &ComplaintState) -> Self {
        state.origin.clone()
    }
}

/// List all complaints
#[utoipa::path(
    get,
    path = "/complaints",
    responses(
        (status = 200, description = "Every filed complaint", body = Vec<ComplaintDto>),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "complaints"
)]
pub async fn list_complaints(
    State(state): State<ComplaintState>,
) -> Result<Json<Vec<ComplaintDto>>> {
    let complaints = state.service.list().await?;
    Ok(Json(complaints))
}

/// File a complaint
///
/// Accepts multipart/form-data with the complaint text fields and zero or
/// more `images` file parts. `location` is a JSON-encoded object.
#[utoipa::path(
    post,
    path = "/complaints",
    request_body(
        content = CreateComplaintForm,
        content_type = "multipart/form-data",
        description = "Complaint fields plus image files",
    ),
    responses(
        (status = 200, description = "Complaint created", body = ComplaintDto),
        (status = 400, description = "Missing or malformed field", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Store or disk failure", body = ErrorResponse)
    ),
    tag = "complaints"
)]
pub async fn create_complaint(
    State(state): State<ComplaintState>,
    RequestOrigin(origin): RequestOrigin,
    mut multipart: Multipart,
) -> Result<Json<ComplaintDto>> {
    let max_file_size = state.service.max_file_size();
    let mut fields = ComplaintFormFields::default();
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        // Only file parts count as images; a text part named `images` is ignored
        if let Some(file_name) = field.file_name().filter(|_| field_name == IMAGES_FIELD) {
            let original_name = file_name.to_string();
            let content_type = field.content_type().map(|s| s.to_string());

            let data = field.bytes().await.map_err(multipart_error)?;
            if data.len() > max_file_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "File '{}' too large. Maximum size is {} bytes ({} MB)",
                    original_name,
                    max_file_size,
                    max_file_size / 1024 / 1024
                )));
            }

            files.push(UploadedFile {
                original_name,
                content_type,
                data: data.to_vec(),
            });
            continue;
        }

        let text = field.text().await.map_err(multipart_error)?;
        if !fields.insert(&field_name, text) {
            debug!("Ignoring unknown field: {}", field_name);
        }
    }

    let dto = fields.into_dto()?;
    let complaint = state.service.create(dto, files, &origin).await?;

    Ok(Json(complaint))
}

fn multipart_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e.body_text()))
    }
}
