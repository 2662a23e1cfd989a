// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login and logout.

use crate::error::{ClientError, Result};
use crate::models::Profile;
use crate::services::http::ApiClient;
use crate::services::session::{AuthState, SessionEvent, SessionExpiryReaction};
use crate::store::CredentialStore;
use std::sync::Arc;

/// Owns the only transition back to the authenticated state: a fresh login.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    store: Arc<dyn CredentialStore>,
    reaction: SessionExpiryReaction,
}

impl AuthService {
    pub fn new(
        api: ApiClient,
        store: Arc<dyn CredentialStore>,
        reaction: SessionExpiryReaction,
    ) -> Self {
        Self {
            api,
            store,
            reaction,
        }
    }

    /// Log in and store the new session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Profile> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ClientError::ValidationFailed(
                "Username and password are required".to_string(),
            ));
        }

        let response = self.api.login(username, password).await?;
        let mut profile = response.profile();
        if profile.username.is_none() {
            profile.username = Some(username.to_string());
        }

        // Drop leftovers of any previous session before storing the new one.
        self.store.clear()?;
        self.store
            .set_tokens(&response.access_token, &response.refresh_token)?;
        self.store.set_profile(&profile)?;

        self.reaction.begin_session();
        tracing::info!(username = %username, is_admin = profile.is_admin, "Logged in");
        self.reaction.events().publish(SessionEvent::LoggedIn);

        Ok(profile)
    }

    pub fn logout(&self) {
        self.reaction.logout();
    }

    pub fn state(&self) -> AuthState {
        self.reaction.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == AuthState::Authenticated
    }

    /// Profile of the current session, if any.
    pub fn profile(&self) -> Option<Profile> {
        self.store.profile()
    }
}
