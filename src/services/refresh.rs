// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exchange of a refresh token for a new access token.

use crate::endpoints;
use crate::error::{ClientError, Result};
use crate::models::credential::{RefreshRequest, RefreshResponse};
use crate::services::http::ApiClient;
use async_trait::async_trait;

/// Refreshes access tokens.
///
/// Implementations make one attempt and have no side effects beyond that
/// call; storing the new token is the caller's job.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Returns the new access token, or `ClientError::RefreshFailed`.
    async fn refresh(&self, refresh_token: &str) -> Result<String>;
}

/// Refresher backed by the token-refresh endpoint.
#[derive(Clone)]
pub struct HttpRefresher {
    api: ApiClient,
}

impl HttpRefresher {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl TokenRefresher for HttpRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<String> {
        let request = self
            .api
            .post(endpoints::TOKEN_REFRESH)
            .json(&RefreshRequest { refresh_token });

        let response = self
            .api
            .send(request)
            .await
            .map_err(|e| ClientError::RefreshFailed(format!("Token refresh request failed: {}", e)))?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "Token refresh rejected");
            return Err(ClientError::RefreshFailed(format!(
                "Token refresh failed with status {}",
                response.status
            )));
        }

        let parsed: RefreshResponse = response
            .json()
            .map_err(|e| ClientError::RefreshFailed(format!("Failed to parse refresh response: {}", e)))?;

        if parsed.access_token.is_empty() {
            return Err(ClientError::RefreshFailed(
                "Refresh response carried an empty access token".to_string(),
            ));
        }

        Ok(parsed.access_token)
    }
}
