// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store: the process-wide holder of the session tokens.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::models::{Credential, Profile};

/// Key names as constants.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const USERNAME: &str = "username";
    pub const IS_ADMIN: &str = "is_admin";
}

/// Key-value store holding the tokens plus profile flags.
///
/// Implementations only need the three primitives; the token accessors are
/// built on top. No validation of token contents happens here.
pub trait CredentialStore: Send + Sync {
    /// Read one entry.
    fn get(&self, key: &str) -> Option<String>;

    /// Write several entries as one update.
    fn set_entries(&self, entries: &[(&str, String)]) -> Result<()>;

    /// Remove every entry. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;

    fn get_access_token(&self) -> Option<String> {
        self.get(keys::ACCESS_TOKEN).filter(|t| !t.is_empty())
    }

    fn get_refresh_token(&self) -> Option<String> {
        self.get(keys::REFRESH_TOKEN).filter(|t| !t.is_empty())
    }

    /// Replace the access token, leaving the refresh token alone.
    fn set_access_token(&self, token: &str) -> Result<()> {
        self.set_entries(&[(keys::ACCESS_TOKEN, token.to_string())])
    }

    /// Store both tokens (login).
    fn set_tokens(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        self.set_entries(&[
            (keys::ACCESS_TOKEN, access_token.to_string()),
            (keys::REFRESH_TOKEN, refresh_token.to_string()),
        ])
    }

    fn set_profile(&self, profile: &Profile) -> Result<()> {
        let mut entries = vec![(keys::IS_ADMIN, profile.is_admin.to_string())];
        if let Some(username) = &profile.username {
            entries.push((keys::USERNAME, username.clone()));
        }
        self.set_entries(&entries)
    }

    /// Both tokens, or `None` when the store is anonymous (including a
    /// partial state with only one of them).
    fn credential(&self) -> Option<Credential> {
        Some(Credential {
            access_token: self.get_access_token()?,
            refresh_token: self.get_refresh_token()?,
        })
    }

    /// Profile flags of an authenticated session.
    fn profile(&self) -> Option<Profile> {
        self.credential()?;
        Some(Profile {
            username: self.get(keys::USERNAME),
            is_admin: self.get(keys::IS_ADMIN).as_deref() == Some("true"),
        })
    }
}
