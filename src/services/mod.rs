// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - network and session logic.

pub mod auth;
pub mod dashboard;
pub mod download;
pub mod executor;
pub mod http;
pub mod refresh;
pub mod session;

pub use auth::AuthService;
pub use dashboard::DashboardApi;
pub use download::{DiskSaver, DownloadService, FileSaver};
pub use executor::AuthenticatedExecutor;
pub use http::{ApiClient, ApiResponse};
pub use refresh::{HttpRefresher, TokenRefresher};
pub use session::{AuthState, SessionEvent, SessionEvents, SessionExpiryReaction, Subscription};
