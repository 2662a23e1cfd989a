// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resource calls behind the dashboard screens.
//!
//! Each method is a thin request factory handed to the executor. Record
//! shapes belong to the backend, so rows are returned as JSON values.

use crate::endpoints;
use crate::error::{ClientError, Result};
use crate::models::{ListQuery, Page, StorageUsage};
use crate::services::executor::AuthenticatedExecutor;
use crate::services::http::ApiClient;
use serde_json::Value;
use validator::Validate;

/// Dashboard resource API.
#[derive(Clone)]
pub struct DashboardApi {
    api: ApiClient,
    executor: AuthenticatedExecutor,
    default_page_size: u32,
}

impl DashboardApi {
    pub fn new(api: ApiClient, executor: AuthenticatedExecutor, default_page_size: u32) -> Self {
        Self {
            api,
            executor,
            default_page_size,
        }
    }

    /// First page at the configured page size, no filters.
    pub fn default_query(&self) -> ListQuery {
        ListQuery::new(1, self.default_page_size)
    }

    // ─── Pedimentos ──────────────────────────────────────────────────────────

    pub async fn list_pedimentos(&self, query: &ListQuery) -> Result<Page<Value>> {
        self.list(endpoints::PEDIMENTOS, query).await
    }

    /// Documents attached to one pedimento.
    pub async fn list_documents(&self, pedimento_id: &str, query: &ListQuery) -> Result<Page<Value>> {
        require_id(pedimento_id, "pedimento")?;
        self.list(&endpoints::pedimento_documents(pedimento_id), query)
            .await
    }

    // ─── Users & importers ───────────────────────────────────────────────────

    pub async fn list_users(&self, query: &ListQuery) -> Result<Page<Value>> {
        self.list(endpoints::USERS, query).await
    }

    pub async fn create_user(&self, user: &Value) -> Result<Value> {
        self.executor
            .execute_json(|token| {
                self.api
                    .send(self.api.post(endpoints::USERS).bearer_auth(token).json(user))
            })
            .await
    }

    /// Partial update of a user record.
    pub async fn update_user(&self, user_id: &str, changes: &Value) -> Result<Value> {
        require_id(user_id, "user")?;
        let path = endpoints::user(user_id);
        self.executor
            .execute_json(|token| {
                self.api
                    .send(self.api.patch(&path).bearer_auth(token).json(changes))
            })
            .await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        require_id(user_id, "user")?;
        let path = endpoints::user(user_id);
        self.executor
            .execute_empty(|token| self.api.send(self.api.delete(&path).bearer_auth(token)))
            .await
    }

    pub async fn list_importers(&self, query: &ListQuery) -> Result<Page<Value>> {
        self.list(endpoints::IMPORTERS, query).await
    }

    // ─── Organization ────────────────────────────────────────────────────────

    pub async fn storage_usage(&self) -> Result<StorageUsage> {
        self.executor
            .execute_json(|token| {
                self.api
                    .send(self.api.get(endpoints::ORGANIZATION_STORAGE).bearer_auth(token))
            })
            .await
    }

    /// Generic paginated GET.
    async fn list(&self, path: &str, query: &ListQuery) -> Result<Page<Value>> {
        query.validate()?;
        let pairs = query.to_pairs();
        self.executor
            .execute_json(|token| {
                self.api
                    .send(self.api.get(path).bearer_auth(token).query(&pairs))
            })
            .await
    }
}

fn require_id(id: &str, what: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(ClientError::ValidationFailed(format!("Missing {} id", what)));
    }
    Ok(())
}
