// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The single choke point for authenticated backend calls.
//!
//! Every call runs as:
//! 1. Read the access token (absent => session expired, no request made)
//! 2. Send the request with the token as a bearer credential
//! 3. On 401, refresh once and retry once with the new token
//! 4. Anything else that is not a success is a `RequestFailed`
//!
//! Concurrent calls that hit 401 at the same time refresh independently.

use crate::error::{ClientError, Result};
use crate::services::http::ApiResponse;
use crate::services::refresh::TokenRefresher;
use crate::services::session::SessionExpiryReaction;
use crate::store::CredentialStore;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;

/// Runs request factories under the refresh-and-retry contract.
#[derive(Clone)]
pub struct AuthenticatedExecutor {
    store: Arc<dyn CredentialStore>,
    refresher: Arc<dyn TokenRefresher>,
    reaction: SessionExpiryReaction,
}

impl AuthenticatedExecutor {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        refresher: Arc<dyn TokenRefresher>,
        reaction: SessionExpiryReaction,
    ) -> Self {
        Self {
            store,
            refresher,
            reaction,
        }
    }

    pub fn reaction(&self) -> &SessionExpiryReaction {
        &self.reaction
    }

    /// Run `request` with the current access token and return the final
    /// successful response.
    ///
    /// `request` is called at most twice: once with the stored token and,
    /// after a 401 and a successful refresh, once with the refreshed token.
    pub async fn execute<F, Fut>(&self, request: F) -> Result<ApiResponse>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<ApiResponse>>,
    {
        let Some(access_token) = self.store.get_access_token() else {
            tracing::debug!("No access token, skipping request");
            self.reaction.reject_anonymous();
            return Err(ClientError::SessionExpired);
        };

        let response = request(access_token).await?;
        if !response.is_unauthorized() {
            return Self::finish(response);
        }

        let Some(refresh_token) = self.store.get_refresh_token() else {
            tracing::info!("Access token rejected and no refresh token stored");
            return Err(self.session_expired());
        };

        tracing::info!("Access token rejected, refreshing");
        let new_access_token = match self.refresher.refresh(&refresh_token).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed");
                return Err(self.session_expired());
            }
        };

        // The retry still uses the refreshed token. If it was not stored, the
        // old token stays in place and the next call refreshes again with the
        // unchanged refresh token.
        if let Err(e) = self.store.set_access_token(&new_access_token) {
            tracing::warn!(
                error = %e,
                "Refreshed access token not stored, next call will refresh again"
            );
        }

        let retried = request(new_access_token).await?;
        if retried.is_unauthorized() {
            tracing::warn!("Refreshed access token rejected");
            return Err(self.session_expired());
        }

        Self::finish(retried)
    }

    /// Run `request` and parse the JSON body.
    pub async fn execute_json<T, F, Fut>(&self, request: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<ApiResponse>>,
    {
        self.execute(request).await?.json()
    }

    /// Run `request` and return the raw (binary) body.
    pub async fn execute_bytes<F, Fut>(&self, request: F) -> Result<Vec<u8>>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<ApiResponse>>,
    {
        Ok(self.execute(request).await?.body)
    }

    /// Run `request`, ignoring any body (e.g. 204 No Content).
    pub async fn execute_empty<F, Fut>(&self, request: F) -> Result<()>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<ApiResponse>>,
    {
        self.execute(request).await.map(|_| ())
    }

    fn finish(response: ApiResponse) -> Result<ApiResponse> {
        if response.is_success() {
            return Ok(response);
        }
        tracing::warn!(status = response.status, "Backend request failed");
        Err(response.into_failure())
    }

    fn session_expired(&self) -> ClientError {
        self.reaction.expire();
        ClientError::SessionExpired
    }
}
