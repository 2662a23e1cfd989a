// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single, bulk (zip) and report downloads saved as local files.

use crate::endpoints;
use crate::error::{ClientError, Result};
use crate::models::download::sanitize_filename;
use crate::models::{DownloadRequest, ReportRequest};
use crate::services::executor::AuthenticatedExecutor;
use crate::services::http::ApiClient;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use validator::Validate;

/// Offers a downloaded payload to the user as a local file.
pub trait FileSaver: Send + Sync {
    /// Save `payload` under `file_name`, returning where it landed.
    fn save(&self, file_name: &str, payload: &[u8]) -> Result<PathBuf>;
}

/// Numbered names tried after the requested one is taken.
const MAX_NAME_SUFFIX: usize = 99;

/// Saves into a fixed download directory.
///
/// The payload is written to a temporary file next to the target and then
/// renamed into place, so a failed save never leaves a partial file behind.
/// An existing file is never overwritten: `report.zip` becomes
/// `report (1).zip`, then `report (2).zip`.
#[derive(Debug, Clone)]
pub struct DiskSaver {
    dir: PathBuf,
}

impl DiskSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSaver for DiskSaver {
    fn save(&self, file_name: &str, payload: &[u8]) -> Result<PathBuf> {
        let name = sanitize_filename(file_name);
        if name.is_empty() {
            return Err(ClientError::ValidationFailed(
                "A file name is required".to_string(),
            ));
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| {
            ClientError::Storage(format!("create {}: {}", self.dir.display(), e))
        })?;

        // Dropping `tmp` on any error path deletes the temporary file.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .map_err(|e| ClientError::Storage(format!("temp file: {}", e)))?;
        tmp.write_all(payload)
            .map_err(|e| ClientError::Storage(format!("write: {}", e)))?;

        for n in 0..=MAX_NAME_SUFFIX {
            let target = self.dir.join(numbered_name(&name, n));
            match tmp.persist_noclobber(&target) {
                Ok(_) => return Ok(target),
                Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => tmp = e.file,
                Err(e) => {
                    return Err(ClientError::Storage(format!(
                        "persist {}: {}",
                        target.display(),
                        e.error
                    )));
                }
            }
        }

        Err(ClientError::Storage(format!(
            "no free file name for {} in {}",
            name,
            self.dir.display()
        )))
    }
}

/// `name` for `n == 0`, otherwise `stem (n).ext`.
fn numbered_name(name: &str, n: usize) -> String {
    if n == 0 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{} ({}).{}", stem, n, ext),
        _ => format!("{} ({})", name, n),
    }
}

/// Download flows built on the authenticated executor.
#[derive(Clone)]
pub struct DownloadService {
    api: ApiClient,
    executor: AuthenticatedExecutor,
    saver: Arc<dyn FileSaver>,
}

impl DownloadService {
    pub fn new(api: ApiClient, executor: AuthenticatedExecutor, saver: Arc<dyn FileSaver>) -> Self {
        Self {
            api,
            executor,
            saver,
        }
    }

    /// Download one document and save it as `file_name`.
    pub async fn download_one(&self, document_id: &str, file_name: &str) -> Result<PathBuf> {
        if document_id.trim().is_empty() {
            return Err(ClientError::ValidationFailed(
                "Select a document to download".to_string(),
            ));
        }
        let name = sanitize_filename(file_name);
        if name.is_empty() {
            return Err(ClientError::ValidationFailed(
                "A file name is required".to_string(),
            ));
        }

        let path = endpoints::document_download(document_id);
        let payload = self
            .executor
            .execute_bytes(|token| self.api.send(self.api.get(&path).bearer_auth(token)))
            .await?;

        self.save(&name, &payload)
    }

    /// Bundle the selected documents into one archive saved as
    /// `{archive_name}.zip`. An empty selection never reaches the network.
    pub async fn download_many(&self, document_ids: &[String], archive_name: &str) -> Result<PathBuf> {
        let request = DownloadRequest::new(document_ids.to_vec(), archive_name);
        request.validate()?;

        tracing::info!(
            count = request.resource_ids.len(),
            archive = %request.archive_name,
            "Requesting bulk download"
        );

        let payload = self
            .executor
            .execute_bytes(|token| {
                self.api.send(
                    self.api
                        .post(endpoints::BULK_DOWNLOAD)
                        .bearer_auth(token)
                        .json(&request),
                )
            })
            .await?;

        self.save(&request.file_name(), &payload)
    }

    /// Generate a report and save it as `file_name`.
    pub async fn download_report(&self, report: &ReportRequest, file_name: &str) -> Result<PathBuf> {
        report.validate()?;
        let name = sanitize_filename(file_name);
        if name.is_empty() {
            return Err(ClientError::ValidationFailed(
                "A file name is required".to_string(),
            ));
        }

        let payload = self
            .executor
            .execute_bytes(|token| {
                self.api
                    .send(self.api.post(endpoints::REPORTS).bearer_auth(token).json(report))
            })
            .await?;

        self.save(&name, &payload)
    }

    fn save(&self, file_name: &str, payload: &[u8]) -> Result<PathBuf> {
        let path = self.saver.save(file_name, payload)?;
        tracing::info!(
            file = %file_name,
            bytes = payload.len(),
            "Download saved"
        );
        Ok(path)
    }
}
