// src/api/client.rs
//! Pure HTTP client wrapper for the wiki API.
//!
//! This module provides a thin wrapper around reqwest for making
//! requests to a MediaWiki `api.php` endpoint and to the image servers
//! it links to. It handles headers, timeouts and status extraction
//! without parsing or business logic.

use super::query::ApiQuery;
use super::{ApiResponse, WikiRepository};
use crate::constants::USER_AGENT;
use crate::error::{AppError, WikiErrorCode};
use crate::types::ValidatedUrl;
use reqwest::{header, Client, Response};
use std::time::Duration;

/// A thin wrapper around reqwest Client for wiki API requests.
#[derive(Clone)]
pub struct WikiHttpClient {
    client: Client,
    api_url: ValidatedUrl,
    timeout: Duration,
}

impl WikiHttpClient {
    /// Creates a client for the given API endpoint with a per-request timeout.
    pub fn new(api_url: ValidatedUrl, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            api_url,
            timeout,
        })
    }

    /// Creates the default headers for wiki requests.
    fn create_headers() -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));
        headers
    }

    /// Makes a GET request to a full URL.
    pub async fn get(&self, url: &str) -> Result<Response, AppError> {
        log::debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(url, e))
    }

    /// The request URL for a query.
    pub fn query_url(&self, query: &ApiQuery) -> String {
        format!("{}?{}", self.api_url.as_str(), query.to_query_string())
    }

    fn classify_transport_error(&self, url: &str, error: reqwest::Error) -> AppError {
        if error.is_timeout() {
            AppError::RequestTimeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            AppError::NetworkFailure(error)
        }
    }
}

#[async_trait::async_trait]
impl WikiRepository for WikiHttpClient {
    async fn query(&self, query: &ApiQuery) -> Result<ApiResponse<String>, AppError> {
        let url = self.query_url(query);
        let response = self.get(&url).await?;
        extract_response_text(response)
            .await
            .map_err(|e| match e {
                AppError::NetworkFailure(inner) => self.classify_transport_error(&url, inner),
                other => other,
            })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let response = self.get(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ServiceStatus {
                code: WikiErrorCode::from_http_status(status.as_u16()),
                status,
                url: url.to_string(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.classify_transport_error(url, e))?;
        Ok(bytes.to_vec())
    }
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
