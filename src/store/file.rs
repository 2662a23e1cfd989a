// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store persisted to a JSON file, so a session survives restarts.

use super::CredentialStore;
use crate::error::{ClientError, Result};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File-backed store. Entries are cached in memory and the whole map is
/// rewritten (temp file + rename) on every mutation. The cache only changes
/// once the disk write has succeeded.
pub struct FileStore {
    path: PathBuf,
    entries: DashMap<String, String>,
    /// Serializes persist-then-apply so snapshots land in order.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open the store at `path`, loading any previously persisted entries.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// also treated as empty (anonymous); it is overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = DashMap::new();

        match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, String>>(&bytes) {
                Ok(map) => {
                    for (k, v) in map {
                        entries.insert(k, v);
                    }
                    tracing::debug!(path = %path.display(), "Loaded persisted credentials");
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Credential file is corrupt, starting anonymous"
                    );
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read credential file, starting anonymous"
                );
            }
        }

        Self {
            path,
            entries,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    fn persist(&self, snapshot: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)
            .map_err(|e| ClientError::Storage(format!("create {}: {}", dir.display(), e)))?;

        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| ClientError::Storage(e.to_string()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| ClientError::Storage(format!("temp file: {}", e)))?;
        tmp.write_all(&json)
            .map_err(|e| ClientError::Storage(format!("write: {}", e)))?;
        tmp.persist(&self.path)
            .map_err(|e| ClientError::Storage(format!("persist {}: {}", self.path.display(), e)))?;

        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned lock only means another writer panicked mid-write; the
        // next persist rewrites the full snapshot anyway.
        self.write_lock.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set_entries(&self, entries: &[(&str, String)]) -> Result<()> {
        let _guard = self.lock();
        let mut snapshot = self.snapshot();
        for (key, value) in entries {
            snapshot.insert((*key).to_string(), value.clone());
        }
        self.persist(&snapshot)?;

        for (key, value) in entries {
            self.entries.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ClientError::Storage(format!(
                    "remove {}: {}",
                    self.path.display(),
                    e
                )));
            }
        }
        self.entries.clear();
        Ok(())
    }
}
