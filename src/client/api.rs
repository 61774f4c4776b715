use reqwest::multipart::{Form, Part};

use crate::client::error::{ClientError, Result};
use crate::client::form::Submission;
use crate::features::complaints::dtos::ComplaintDto;
use crate::shared::constants::IMAGES_FIELD;
use crate::shared::types::ErrorResponse;

/// HTTP client for the complaints API
pub struct ComplaintsApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl ComplaintsApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every complaint
    pub async fn list(&self) -> Result<Vec<ComplaintDto>> {
        let url = format!("{}/complaints", self.base_url);
        tracing::debug!("Fetching complaints from {}", url);

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            tracing::error!("Failed to fetch complaints: {}", e);
            ClientError::Transport(e)
        })?;

        let response = check_status(response).await?;
        let complaints = response.json::<Vec<ComplaintDto>>().await.map_err(|e| {
            tracing::error!("Failed to parse complaints response: {}", e);
            ClientError::Transport(e)
        })?;

        tracing::debug!("Fetched {} complaints", complaints.len());
        Ok(complaints)
    }

    /// Submit a complaint as multipart form data.
    ///
    /// Text fields go first, then one `images` part per attachment.
    pub async fn create(&self, submission: &Submission) -> Result<ComplaintDto> {
        let url = format!("{}/complaints", self.base_url);

        let mut form = Form::new();
        for (name, value) in submission.complaint.to_form_fields()? {
            form = form.text(name, value);
        }
        for image in &submission.images {
            let part = Part::bytes(image.data.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)?;
            form = form.part(IMAGES_FIELD, part);
        }

        tracing::debug!(
            "Submitting complaint '{}' with {} image(s)",
            submission.complaint.title,
            submission.images.len()
        );

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to submit complaint: {}", e);
                ClientError::Transport(e)
            })?;

        let response = check_status(response).await?;
        let complaint = response.json::<ComplaintDto>().await.map_err(|e| {
            tracing::error!("Failed to parse created complaint: {}", e);
            ClientError::Transport(e)
        })?;

        tracing::info!("Complaint submitted: {}", complaint.id);
        Ok(complaint)
    }
}

/// Turn a non-success response into [`ClientError::Status`], using the `{error}` body when present
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);

    tracing::error!("Complaints API error: HTTP {} - {}", status, message);
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::form::{ComplaintForm, ImageAttachment};
    use crate::core::extractor::PublicOrigin;
    use crate::features::complaints::models::Department;
    use crate::features::complaints::repositories::ComplaintRepository;
    use crate::features::complaints::{routes, upload_routes, ComplaintService};
    use crate::modules::storage::LocalDiskStorage;
    use crate::shared::test_helpers::{FailingComplaintRepository, InMemoryComplaintRepository};
    use chrono::Utc;
    use std::sync::Arc;

    async fn spawn_server(
        repository: Arc<dyn ComplaintRepository>,
    ) -> (tempfile::TempDir, ComplaintsApiClient) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(
            LocalDiskStorage::new(dir.path().to_path_buf(), 1024 * 1024)
                .await
                .unwrap(),
        );
        let service = Arc::new(ComplaintService::new(repository, storage));
        let app = routes(service, PublicOrigin::new(None, "localhost"), 4 * 1024 * 1024)
            .merge(upload_routes(dir.path()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (dir, ComplaintsApiClient::new(format!("http://{}/", addr)))
    }

    fn submission(images: Vec<ImageAttachment>) -> Submission {
        let mut form = ComplaintForm {
            title: "Streetlight out".into(),
            description: "Dark stretch near the school gate".into(),
            department: Some(Department::Electrical),
            images,
            ..Default::default()
        };
        form.capture_location(12.9716, 77.5946).unwrap();
        form.to_submission(Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_list_round_trip() {
        let (_dir, client) = spawn_server(Arc::new(InMemoryComplaintRepository::default())).await;
        assert!(!client.base_url().ends_with('/'));

        let photo = ImageAttachment {
            file_name: "lamp.jpg".into(),
            content_type: "image/jpeg".into(),
            data: b"jpeg bytes".to_vec(),
        };
        let created = client.create(&submission(vec![photo])).await.unwrap();

        assert_eq!(created.concerned_department, Department::Electrical);
        assert_eq!(created.status, "Pending");
        assert_eq!(created.images.len(), 1);
        assert!(created.location.as_ref().unwrap().geohash.starts_with("tdr1"));

        let image = reqwest::get(&created.images[0]).await.unwrap();
        assert!(image.status().is_success());
        assert_eq!(image.bytes().await.unwrap().as_ref(), b"jpeg bytes");

        let listed = client.list().await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_server_error_message_is_surfaced() {
        let (_dir, client) = spawn_server(Arc::new(FailingComplaintRepository)).await;

        match client.list().await {
            Err(ClientError::Status { status, message }) => {
                assert_eq!(status, 500);
                assert!(!message.is_empty());
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }
}
