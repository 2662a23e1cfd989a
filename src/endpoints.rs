// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend REST paths.

pub const LOGIN: &str = "/api/token/";
pub const TOKEN_REFRESH: &str = "/api/token/refresh/";
pub const PEDIMENTOS: &str = "/api/pedimentos/";
pub const USERS: &str = "/api/users/";
pub const IMPORTERS: &str = "/api/importers/";
pub const ORGANIZATION_STORAGE: &str = "/api/organization/storage/";
pub const REPORTS: &str = "/api/reports/";
pub const BULK_DOWNLOAD: &str = "/api/documents/bulk-download/";

/// Documents attached to one pedimento.
pub fn pedimento_documents(pedimento_id: &str) -> String {
    format!("/api/pedimentos/{}/documents/", urlencoding::encode(pedimento_id))
}

/// Binary download of a single document.
pub fn document_download(document_id: &str) -> String {
    format!("/api/documents/{}/download/", urlencoding::encode(document_id))
}

/// A single user record.
pub fn user(user_id: &str) -> String {
    format!("/api/users/{}/", urlencoding::encode(user_id))
}
