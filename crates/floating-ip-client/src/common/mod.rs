//! Common utilities for the floating IP API client
//!
//! Authenticated request helpers shared by all endpoints.

use crate::error::FloatingIpError;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// HTTP client wrapper with bearer authentication
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: String,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, base_url: String, token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from an API path
    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Make a GET request
    pub async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
    ) -> Result<T, FloatingIpError> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(FloatingIpError::Http)?;

        Self::decode("GET", path, response).await
    }

    /// Make a POST request with a JSON body
    pub async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, FloatingIpError> {
        let url = self.build_url(path);
        debug!("POST {} with body: {}", url, body);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(FloatingIpError::Http)?;

        Self::decode("POST", path, response).await
    }

    /// Map the response status to an error, or decode the JSON body
    async fn decode<T: for<'de> Deserialize<'de>>(
        verb: &str,
        path: &str,
        response: Response,
    ) -> Result<T, FloatingIpError> {
        let status = response.status();
        if status.is_success() {
            let text = response.text().await?;
            return serde_json::from_str(&text).map_err(|e| {
                FloatingIpError::Api(format!(
                    "error decoding {} {} response: {} - Response (first 500 chars): {}",
                    verb,
                    path,
                    e,
                    text.chars().take(500).collect::<String>()
                ))
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::NOT_FOUND => {
                FloatingIpError::NotFound(format!("{} {}: {}", verb, path, body))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                FloatingIpError::Authentication(format!("{} {}: {} - {}", verb, path, status, body))
            }
            _ => FloatingIpError::Api(format!("{} {} failed: {} - {}", verb, path, status, body)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_base_and_path() {
        let http = HttpClient::new(
            Client::new(),
            "https://api.digitalocean.com/".to_string(),
            "token".to_string(),
        );

        assert_eq!(http.base_url(), "https://api.digitalocean.com");
        assert_eq!(
            http.build_url("/v2/floating_ips/45.55.96.47"),
            "https://api.digitalocean.com/v2/floating_ips/45.55.96.47"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let http = HttpClient::new(
            Client::new(),
            "http://localhost".to_string(),
            "dop_v1_secret".to_string(),
        );

        assert!(!format!("{:?}", http).contains("dop_v1_secret"));
        assert_eq!(http.auth_header(), "Bearer dop_v1_secret");
    }
}
