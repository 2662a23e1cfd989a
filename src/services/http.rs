// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Low-level HTTP client for the dashboard backend.
//!
//! Handles:
//! - Base URL joining and the request timeout
//! - Buffering responses into [`ApiResponse`]
//! - The unauthenticated login call
//!
//! Authenticated calls go through `AuthenticatedExecutor`, never directly.

use crate::config::Config;
use crate::endpoints;
use crate::error::{ClientError, Result};
use crate::models::credential::{LoginRequest, LoginResponse};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Longest body excerpt kept in error values and logs.
const MAX_ERROR_BODY_CHARS: usize = 2048;

/// Backend HTTP client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base_url, config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.post(self.url(path))
    }

    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.patch(self.url(path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.delete(self.url(path))
    }

    /// Send a request and buffer the whole response.
    pub async fn send(&self, request: reqwest::RequestBuilder) -> Result<ApiResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        ApiResponse::from_reqwest(response).await
    }

    /// Exchange username/password for a token pair.
    ///
    /// Any non-success status is reported as invalid credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let response = self
            .send(self.post(endpoints::LOGIN).json(&LoginRequest { username, password }))
            .await?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "Login rejected");
            return Err(ClientError::InvalidCredentials);
        }

        response.json()
    }
}

/// Fully buffered HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    /// JSON response, mostly for fakes in tests.
    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: value.to_string().into_bytes(),
        }
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read response body: {}", e)))?;

        Ok(Self {
            status,
            content_type,
            body: body.to_vec(),
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Body as text, truncated for error reporting. `None` when empty.
    pub fn body_excerpt(&self) -> Option<String> {
        if self.body.is_empty() {
            return None;
        }
        let text = String::from_utf8_lossy(&self.body);
        Some(text.chars().take(MAX_ERROR_BODY_CHARS).collect())
    }

    /// Parse the body as JSON; anything else is a malformed response.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            let reason = match &self.content_type {
                Some(ct) if !ct.contains("json") => {
                    format!("expected JSON, got {}: {}", ct, e)
                }
                _ => format!("JSON parse error: {}", e),
            };
            ClientError::malformed(self.status, reason)
        })
    }

    /// Convert a non-success response into the caller-visible failure.
    pub fn into_failure(self) -> ClientError {
        ClientError::status_failure(self.status, self.body_excerpt())
    }
}
