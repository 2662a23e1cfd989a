// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pedimentos dashboard client: session handling and backend access for the
//! customs-document administration dashboard.
//!
//! Every authenticated call goes through [`services::AuthenticatedExecutor`],
//! which owns the refresh-and-retry contract and the session-expiry reaction.

pub mod config;
pub mod endpoints;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;

use config::Config;
use error::Result;
use services::{
    ApiClient, AuthService, AuthenticatedExecutor, DashboardApi, DiskSaver, DownloadService,
    FileSaver, HttpRefresher, SessionEvents, SessionExpiryReaction, TokenRefresher,
};
use std::sync::Arc;
use store::{CredentialStore, FileStore};

/// Shared client state: one per running dashboard.
pub struct Client {
    pub config: Config,
    pub store: Arc<dyn CredentialStore>,
    pub events: SessionEvents,
    pub auth: AuthService,
    pub executor: AuthenticatedExecutor,
    pub dashboard: DashboardApi,
    pub downloads: DownloadService,
}

impl Client {
    /// Wire the production pieces: file-backed credentials, the HTTP
    /// refresher and saving into the download directory.
    pub fn from_config(config: Config) -> Result<Self> {
        let api = ApiClient::from_config(&config)?;
        let store: Arc<dyn CredentialStore> = Arc::new(FileStore::open(&config.credentials_path));
        let refresher: Arc<dyn TokenRefresher> = Arc::new(HttpRefresher::new(api.clone()));
        let saver: Arc<dyn FileSaver> = Arc::new(DiskSaver::new(&config.download_dir));
        Ok(Self::with_parts(config, api, store, refresher, saver))
    }

    /// Wire a client from explicit parts (tests, embedded front ends).
    pub fn with_parts(
        config: Config,
        api: ApiClient,
        store: Arc<dyn CredentialStore>,
        refresher: Arc<dyn TokenRefresher>,
        saver: Arc<dyn FileSaver>,
    ) -> Self {
        let events = SessionEvents::new();
        let reaction = SessionExpiryReaction::from_config(store.clone(), events.clone(), &config);
        let executor = AuthenticatedExecutor::new(store.clone(), refresher, reaction.clone());

        tracing::info!(api = %api.base_url(), "Dashboard client initialized");

        Self {
            auth: AuthService::new(api.clone(), store.clone(), reaction),
            dashboard: DashboardApi::new(api.clone(), executor.clone(), config.default_page_size),
            downloads: DownloadService::new(api, executor.clone(), saver),
            executor,
            events,
            store,
            config,
        }
    }
}
