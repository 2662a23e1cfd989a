// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session credentials and the auth endpoint payloads.

use serde::{Deserialize, Serialize};

/// Access/refresh token pair held by an authenticated session.
///
/// Tokens are opaque; their meaning belongs to the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Profile flags stored next to the tokens, used to decide what to render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: Option<String>,
    pub is_admin: bool,
}

/// Login request body.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Login response from the backend.
#[derive(Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access")]
    pub access_token: String,
    #[serde(alias = "refresh")]
    pub refresh_token: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, alias = "is_superuser")]
    pub is_admin: bool,
}

impl LoginResponse {
    pub fn credential(&self) -> Credential {
        Credential {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }

    pub fn profile(&self) -> Profile {
        Profile {
            username: self.username.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// Refresh request body.
#[derive(Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Refresh response from the backend.
#[derive(Deserialize)]
pub struct RefreshResponse {
    #[serde(alias = "access")]
    pub access_token: String,
}
