// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the client.

pub mod credential;
pub mod download;
pub mod organization;
pub mod query;

pub use credential::{Credential, LoginResponse, Profile, RefreshResponse};
pub use download::{DownloadRequest, ReportRequest};
pub use organization::StorageUsage;
pub use query::{ListQuery, Page};
