// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Non-interactive commands and service wiring.

use std::sync::Arc;

use colored::Colorize;
use fixdesk_config::FixdeskConfig;
use fixdesk_conversation::ConversationServices;
use fixdesk_core::FixdeskError;
use fixdesk_core::traits::{ConversationStore, ServiceAdapter};
use fixdesk_core::types::{HealthStatus, LogFilter, LogSummary};
use fixdesk_http::{AssistantClient, BackendClient};

/// Builds the HTTP adapters and the conversation services from config.
pub fn build_services(config: &FixdeskConfig) -> Result<ConversationServices, FixdeskError> {
    let backend = Arc::new(BackendClient::new(&config.backend)?);
    let assistant = Arc::new(AssistantClient::new(&config.assistant)?);
    Ok(ConversationServices::new(
        backend.clone(),
        assistant,
        backend,
        &config.knowledge,
    ))
}

/// Runs `fixdesk logs`.
pub async fn run_logs(
    config: &FixdeskConfig,
    machine: Option<String>,
    resolved: Option<bool>,
) -> Result<(), FixdeskError> {
    let backend = BackendClient::new(&config.backend)?;
    let filter = LogFilter {
        machine_name: machine,
        resolved,
    };
    let logs = backend.list_logs(&filter).await?;
    if logs.is_empty() {
        println!("{}", "no logs match".dimmed());
        return Ok(());
    }
    for row in &logs {
        println!("{}", format_log_row(row));
    }
    Ok(())
}

fn format_log_row(row: &LogSummary) -> String {
    let status = if row.resolved { "resolved" } else { "open" };
    format!(
        "{:>6}  {:<8}  {:<16}  {}  {}",
        row.log_id.0, status, row.machine_name, row.date_created, row.content
    )
}

/// Runs `fixdesk check`.
pub async fn run_check(config: &FixdeskConfig) -> Result<(), FixdeskError> {
    let adapters: Vec<Box<dyn ServiceAdapter>> = vec![
        Box::new(BackendClient::new(&config.backend)?),
        Box::new(AssistantClient::new(&config.assistant)?),
    ];

    let mut healthy = true;
    for adapter in &adapters {
        let status = adapter.health_check().await?;
        healthy &= status == HealthStatus::Healthy;
        println!("{:<10} {}", adapter.name(), describe_health(&status));
    }

    if healthy {
        Ok(())
    } else {
        Err(FixdeskError::Internal("one or more services are not healthy".into()))
    }
}

fn describe_health(status: &HealthStatus) -> String {
    match status {
        HealthStatus::Healthy => "healthy".green().to_string(),
        HealthStatus::Degraded(reason) => format!("{} ({reason})", "degraded".yellow()),
        HealthStatus::Unhealthy(reason) => format!("{} ({reason})", "unhealthy".red()),
    }
}
