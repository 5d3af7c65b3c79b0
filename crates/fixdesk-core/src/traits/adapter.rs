// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait that every collaborator adapter implements.

use async_trait::async_trait;

use crate::error::FixdeskError;
use crate::types::HealthStatus;

/// Identity and health for a collaborator service adapter.
#[async_trait]
pub trait ServiceAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Performs a health check and returns the service's current status.
    async fn health_check(&self) -> Result<HealthStatus, FixdeskError>;
}
