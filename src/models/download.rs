// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Download and report requests.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

/// Archive name used when the caller leaves it blank.
pub const DEFAULT_ARCHIVE_NAME: &str = "pedimentos";

/// Selection of documents to bundle into one zip archive.
///
/// Serializes as the bulk-download request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct DownloadRequest {
    #[validate(length(min = 1, message = "Select at least one document to download"))]
    pub resource_ids: Vec<String>,
    pub archive_name: String,
}

impl DownloadRequest {
    /// Build a request, defaulting a blank archive name and dropping a `.zip`
    /// suffix the caller may already have typed.
    pub fn new(resource_ids: Vec<String>, archive_name: &str) -> Self {
        let name = sanitize_filename(archive_name);
        let name = name
            .strip_suffix(".zip")
            .map(str::to_string)
            .unwrap_or(name);
        let archive_name = if name.trim().is_empty() {
            DEFAULT_ARCHIVE_NAME.to_string()
        } else {
            name
        };
        Self {
            resource_ids,
            archive_name,
        }
    }

    /// Local file name the archive is saved under.
    pub fn file_name(&self) -> String {
        format!("{}.zip", self.archive_name)
    }
}

/// Report generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
#[validate(schema(function = "validate_date_range"))]
pub struct ReportRequest {
    #[validate(length(min = 1, message = "Choose a report type"))]
    pub report_type: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, String>,
}

fn validate_date_range(req: &ReportRequest) -> Result<(), ValidationError> {
    if req.date_from > req.date_to {
        let mut err = ValidationError::new("date_range");
        err.message = Some("The start date must not be after the end date".into());
        return Err(err);
    }
    Ok(())
}

/// Reduce a caller-chosen name to a bare file name (no directories, no
/// control characters).
pub fn sanitize_filename(name: &str) -> String {
    let last = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    match cleaned.as_str() {
        "." | ".." => String::new(),
        _ => cleaned,
    }
}
