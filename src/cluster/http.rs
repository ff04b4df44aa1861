//! HTTP utilities for API-server calls

use crate::error::{Error, Result};
use reqwest::{Client, Method};

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < MAX_LOG_BODY_LENGTH)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for API-server calls
#[derive(Clone)]
pub struct ClusterHttpClient {
    client: Client,
}

impl ClusterHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("kubegate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::transport(None, format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Make a GET request, returning the raw response body
    pub async fn get(&self, url: &str, token: Option<&str>) -> Result<Vec<u8>> {
        self.execute(Method::GET, url, token, None, &[]).await
    }

    /// Make a POST request with a raw body
    pub async fn post(
        &self,
        url: &str,
        token: Option<&str>,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>> {
        self.execute(Method::POST, url, token, Some(body), headers)
            .await
    }

    /// Make a PUT request with a raw body
    pub async fn put(
        &self,
        url: &str,
        token: Option<&str>,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>> {
        self.execute(Method::PUT, url, token, Some(body), headers)
            .await
    }

    /// Make a DELETE request carrying a raw body
    pub async fn delete(
        &self,
        url: &str,
        token: Option<&str>,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>> {
        self.execute(Method::DELETE, url, token, Some(body), headers)
            .await
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: Option<Vec<u8>>,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(None, format!("Failed to send request: {e}")))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::transport(None, format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            let body_text = String::from_utf8_lossy(&bytes);
            // Security: only log sanitized/truncated error body
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body_text));
            let message = if body_text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                sanitize_for_log(&body_text)
            };
            return Err(Error::transport(Some(status.as_u16()), message));
        }

        Ok(bytes.to_vec())
    }
}
