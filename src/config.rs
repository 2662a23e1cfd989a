// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CREDENTIALS_PATH: &str = ".pedimentos/credentials.json";
const DEFAULT_DOWNLOAD_DIR: &str = "downloads";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOGIN_PATH: &str = "/login";
const DEFAULT_REDIRECT_DELAY_MS: u64 = 2500;
const DEFAULT_PAGE_SIZE: u32 = 20;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, without trailing slash
    pub api_base_url: String,
    /// Where the credential store is persisted
    pub credentials_path: PathBuf,
    /// Directory where downloaded files are saved
    pub download_dir: PathBuf,
    /// HTTP client timeout
    pub request_timeout: Duration,
    /// Login entry point used after session expiry
    pub login_path: String,
    /// Delay between the expiry message and the redirect
    pub expiry_redirect_delay: Duration,
    /// Page size used when a screen does not pick one
    pub default_page_size: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = env::var("PEDIMENTOS_API_URL")
            .map(|v| normalize_base_url(&v))
            .map_err(|_| ConfigError::Missing("PEDIMENTOS_API_URL"))?;
        if api_base_url.is_empty() {
            return Err(ConfigError::Missing("PEDIMENTOS_API_URL"));
        }

        Ok(Self {
            api_base_url,
            credentials_path: env::var("PEDIMENTOS_CREDENTIALS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CREDENTIALS_PATH)),
            download_dir: env::var("PEDIMENTOS_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DOWNLOAD_DIR)),
            request_timeout: Duration::from_secs(parse_or(
                "PEDIMENTOS_REQUEST_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )),
            login_path: env::var("PEDIMENTOS_LOGIN_PATH")
                .unwrap_or_else(|_| DEFAULT_LOGIN_PATH.to_string()),
            expiry_redirect_delay: Duration::from_millis(parse_or(
                "PEDIMENTOS_EXPIRY_REDIRECT_DELAY_MS",
                DEFAULT_REDIRECT_DELAY_MS,
            )),
            default_page_size: parse_or("PEDIMENTOS_DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE),
        })
    }

    /// Fixed config for tests.
    pub fn test_default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            credentials_path: PathBuf::from("target/test-credentials.json"),
            download_dir: PathBuf::from("target/test-downloads"),
            request_timeout: Duration::from_secs(5),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            expiry_redirect_delay: Duration::from_millis(10),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
