use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap, Uri},
};

/// How public URLs for uploaded media are rooted
#[derive(Debug, Clone)]
pub struct PublicOrigin {
    /// Fixed origin from configuration; wins over anything the request says
    pub base_url: Option<String>,
    /// Host used when the request has neither a `Host` header nor an absolute URI
    pub fallback_host: String,
}

impl PublicOrigin {
    pub fn new(base_url: Option<String>, fallback_host: impl Into<String>) -> Self {
        Self {
            base_url: base_url.map(|b| b.trim_end_matches('/').to_string()),
            fallback_host: fallback_host.into(),
        }
    }

    /// Resolve `scheme://host` for the current request
    pub fn resolve(&self, headers: &HeaderMap, uri: &Uri) -> String {
        if let Some(base) = &self.base_url {
            return base.clone();
        }

        let host = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .or_else(|| uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| self.fallback_host.clone());

        let scheme = uri.scheme_str().unwrap_or("http");
        format!("{}://{}", scheme, host)
    }
}

/// Origin (`scheme://host`) that uploaded file URLs are built on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin(pub String);

impl<S> FromRequestParts<S> for RequestOrigin
where
    PublicOrigin: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let origin = PublicOrigin::from_ref(state);
        Ok(Self(origin.resolve(&parts.headers, &parts.uri)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_configured_base_url_wins() {
        let origin = PublicOrigin::new(Some("https://cdn.example.org/".into()), "localhost:5000");
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("api.example.org"));

        let uri: Uri = "/complaints".parse().unwrap();
        assert_eq!(origin.resolve(&headers, &uri), "https://cdn.example.org");
    }

    #[test]
    fn test_host_header_used_when_unconfigured() {
        let origin = PublicOrigin::new(None, "localhost:5000");
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("192.168.1.4:5000"));

        let uri: Uri = "/complaints".parse().unwrap();
        assert_eq!(origin.resolve(&headers, &uri), "http://192.168.1.4:5000");
    }

    #[test]
    fn test_falls_back_to_uri_then_default_host() {
        let origin = PublicOrigin::new(None, "localhost:5000");
        let headers = HeaderMap::new();

        let absolute: Uri = "https://reports.city.gov/complaints".parse().unwrap();
        assert_eq!(origin.resolve(&headers, &absolute), "https://reports.city.gov");

        let relative: Uri = "/complaints".parse().unwrap();
        assert_eq!(origin.resolve(&headers, &relative), "http://localhost:5000");
    }
}
