// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Organization-level data shown on the dashboard.

use serde::{Deserialize, Serialize};

/// Document storage consumed by the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageUsage {
    pub used_bytes: u64,
    pub quota_bytes: u64,
}

impl StorageUsage {
    /// Percentage of the quota in use, capped at 100. Zero quota reads as full.
    pub fn percent_used(&self) -> f64 {
        if self.quota_bytes == 0 {
            return 100.0;
        }
        (self.used_bytes as f64 / self.quota_bytes as f64 * 100.0).min(100.0)
    }

    pub fn remaining_bytes(&self) -> u64 {
        self.quota_bytes.saturating_sub(self.used_bytes)
    }
}
