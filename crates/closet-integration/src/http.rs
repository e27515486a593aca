//! Thin wrapper around `reqwest` that knows the API base URL

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::error::IntegrationError;

/// Base URL used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Shared HTTP client bound to one API base URL
#[derive(Debug, Clone)]
pub struct ApiHttp {
    client: Client,
    base_url: String,
}

impl ApiHttp {
    /// Build a client with JSON accept headers and a request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, IntegrationError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| IntegrationError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/api/items`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Resolve an image URL from the server for display. Absolute URLs pass
    /// through; server-relative ones (`/uploads/...`) are joined to the base.
    pub fn resolve(&self, url: &str) -> String {
        resolve_url(&self.base_url, url)
    }
}

pub fn resolve_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:") {
        url.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }
}

/// Decode a JSON body, or turn a non-success status into an error
pub async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, IntegrationError> {
    let response = check_status(response).await?;
    Ok(response.json().await?)
}

/// Fail on a non-success status and drop the body otherwise
pub async fn expect_success(response: Response) -> Result<(), IntegrationError> {
    check_status(response).await.map(|_| ())
}

async fn check_status(response: Response) -> Result<Response, IntegrationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(IntegrationError::from_status(status.as_u16(), error_detail(&text)))
}

/// FastAPI wraps messages as `{"detail": ...}`; fall back to the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned())
        .map(|detail| match detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let http = ApiHttp::with_client(Client::new(), "http://localhost:8000/");
        assert_eq!(http.base_url(), "http://localhost:8000");
        assert_eq!(http.url("/api/items"), "http://localhost:8000/api/items");
        assert_eq!(http.url("api/health"), "http://localhost:8000/api/health");
    }

    #[test]
    fn test_resolve_image_urls() {
        let http = ApiHttp::with_client(Client::new(), "http://closet.local:8000");
        assert_eq!(
            http.resolve("/uploads/abc.jpg"),
            "http://closet.local:8000/uploads/abc.jpg"
        );
        let s3 = "https://bucket.s3.us-east-1.amazonaws.com/clothing-items/x.png";
        assert_eq!(http.resolve(s3), s3);
    }

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(error_detail(r#"{"detail": "Item not found"}"#), "Item not found");
        assert_eq!(error_detail("plain failure"), "plain failure");
        let nested = error_detail(r#"{"detail": [{"loc": ["body"], "msg": "bad"}]}"#);
        assert!(nested.contains("bad"));
    }
}
