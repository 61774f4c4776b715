use std::path::Path;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::services::ServeDir;

use crate::core::extractor::PublicOrigin;
use crate::features::complaints::handlers::{self, ComplaintState};
use crate::features::complaints::services::ComplaintService;
use crate::shared::constants::UPLOADS_ROUTE;

/// Create routes for the complaints feature
pub fn routes(service: Arc<ComplaintService>, origin: PublicOrigin, body_limit: usize) -> Router {
    let state = ComplaintState { service, origin };

    Router::new()
        .route(
            "/complaints",
            get(handlers::list_complaints)
                .post(handlers::create_complaint)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Static passthrough for uploaded media; unknown names answer 404
pub fn upload_routes(upload_dir: &Path) -> Router {
    Router::new().nest_service(UPLOADS_ROUTE, ServeDir::new(upload_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::complaints::dtos::ComplaintDto;
    use crate::modules::storage::LocalDiskStorage;
    use crate::shared::test_helpers::{FailingComplaintRepository, InMemoryComplaintRepository};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const BOUNDARY: &str = "complaint-test-boundary";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_body(parts: &[Part]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, file_name, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: image/png\r\n\r\n",
                            name, file_name
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn post_complaint(parts: &[Part]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/complaints")
            .header(header::HOST, "complaints.test:5000")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn test_app(
        repository: Arc<dyn crate::features::complaints::repositories::ComplaintRepository>,
    ) -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(
            LocalDiskStorage::new(dir.path().to_path_buf(), 1024 * 1024)
                .await
                .unwrap(),
        );
        let service = Arc::new(ComplaintService::new(repository, storage));
        let app = routes(service, PublicOrigin::new(None, "localhost:5000"), 4 * 1024 * 1024)
            .merge(upload_routes(dir.path()));
        (dir, app)
    }

    fn required_fields() -> Vec<Part<'static>> {
        vec![
            Part::Text("title", "Burst pipe"),
            Part::Text("description", "Water gushing onto the road"),
            Part::Text("concerned_department", "Water"),
        ]
    }

    #[tokio::test]
    async fn test_create_with_images_serves_identical_bytes() {
        let (_dir, app) = test_app(Arc::new(InMemoryComplaintRepository::default())).await;

        let first: &[u8] = b"\x89PNG first image";
        let second: &[u8] = b"\x89PNG second image, a bit longer";
        let mut parts = required_fields();
        parts.push(Part::Text(
            "location",
            r#"{"latitude":12.9716,"longitude":77.5946,"geohash":"tdr1v9q7x"}"#,
        ));
        parts.push(Part::File("images", "one.png", first));
        parts.push(Part::File("images", "two.png", second));

        let response = app.clone().oneshot(post_complaint(&parts)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created: ComplaintDto = body_json(response).await;

        assert_eq!(created.images.len(), 2);
        assert_eq!(created.status, "Pending");
        assert!(!created.approved);
        assert_eq!((created.upvotes, created.downvotes), (0, 0));
        assert_eq!(created.audio_note, None);
        assert_eq!(created.location.as_ref().unwrap().geohash, "tdr1v9q7x");

        for (url, expected) in created.images.iter().zip([first, second]) {
            let path = url
                .strip_prefix("http://complaints.test:5000")
                .expect("url rooted at request host");
            assert!(path.starts_with("/uploads/"));

            let response = app.clone().oneshot(get(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_bytes(response).await, expected);
        }
    }

    #[tokio::test]
    async fn test_list_returns_created_complaints() {
        let (_dir, app) = test_app(Arc::new(InMemoryComplaintRepository::default())).await;

        let mut ids = Vec::new();
        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(post_complaint(&required_fields()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let created: ComplaintDto = body_json(response).await;
            assert!(created.images.is_empty());
            ids.push(created.id);
        }

        let response = app.oneshot(get("/complaints")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed: Vec<ComplaintDto> = body_json(response).await;
        for id in ids {
            assert!(listed.iter().any(|c| c.id == id));
        }
    }

    #[tokio::test]
    async fn test_text_part_named_images_is_not_stored() {
        let (dir, app) = test_app(Arc::new(InMemoryComplaintRepository::default())).await;

        let mut parts = required_fields();
        parts.push(Part::Text("images", "[]"));
        let response = app.oneshot(post_complaint(&parts)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let created: ComplaintDto = body_json(response).await;
        assert!(created.images.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_long_title_is_accepted() {
        let (_dir, app) = test_app(Arc::new(InMemoryComplaintRepository::default())).await;

        let title = "Streetlight out".repeat(40);
        let parts = vec![
            Part::Text("title", &title),
            Part::Text("description", "Whole lane dark since Monday"),
            Part::Text("concerned_department", "Electrical"),
        ];
        let response = app.oneshot(post_complaint(&parts)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let created: ComplaintDto = body_json(response).await;
        assert_eq!(created.title, title);
    }

    #[tokio::test]
    async fn test_missing_title_is_bad_request() {
        let (_dir, app) = test_app(Arc::new(InMemoryComplaintRepository::default())).await;

        let parts = vec![
            Part::Text("description", "No title given"),
            Part::Text("concerned_department", "Municipal"),
        ];
        let response = app.oneshot(post_complaint(&parts)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["error"], "title is required");
    }

    #[tokio::test]
    async fn test_store_failure_is_500_with_error_message() {
        let (dir, app) = test_app(Arc::new(FailingComplaintRepository)).await;

        let response = app.clone().oneshot(get("/complaints")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = body_json(response).await;
        assert!(body["error"].is_string());

        let mut parts = required_fields();
        parts.push(Part::File("images", "orphan.png", b"data"));
        let response = app.oneshot(post_complaint(&parts)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_upload_is_404() {
        let (_dir, app) = test_app(Arc::new(InMemoryComplaintRepository::default())).await;
        let response = app.oneshot(get("/uploads/missing.png")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
