//! Best-effort audit logging.
//!
//! Every completed moderation produces one audit entry. Sinks are allowed
//! to fail; the caller logs the failure and moves on — a broken audit
//! channel must never block or change a verdict.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Serialize;
use tracing::info;

/// Webhook URL for the JSON audit sink; unset means log-only auditing.
pub const ENV_AUDIT_WEBHOOK: &str = "MODERATION_AUDIT_WEBHOOK";

/// One audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    /// "info" | "warning" | "error"
    pub log_type: String,
    /// Originating module, e.g. "moderation".
    pub module: String,
    pub message: String,
    pub details: String,
}

impl AuditEntry {
    pub fn info(module: &str, message: &str, details: impl Into<String>) -> Self {
        Self::new("info", module, message, details)
    }

    pub fn warning(module: &str, message: &str, details: impl Into<String>) -> Self {
        Self::new("warning", module, message, details)
    }

    fn new(log_type: &str, module: &str, message: &str, details: impl Into<String>) -> Self {
        Self {
            log_type: log_type.to_string(),
            module: module.to_string(),
            message: message.to_string(),
            details: details.into(),
        }
    }
}

#[async_trait::async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, entry: &AuditEntry) -> Result<()>;
}

pub type DynAuditLog = Arc<dyn AuditLog>;

/// Pick a sink from the environment: webhook when configured, otherwise
/// the process log.
pub fn audit_from_env() -> DynAuditLog {
    match std::env::var(ENV_AUDIT_WEBHOOK) {
        Ok(url) if !url.trim().is_empty() => Arc::new(WebhookAudit::new(url)),
        _ => Arc::new(TracingAudit),
    }
}

/// Audit sink that writes entries to the process log. Never fails.
pub struct TracingAudit;

#[async_trait::async_trait]
impl AuditLog for TracingAudit {
    async fn record(&self, entry: &AuditEntry) -> Result<()> {
        info!(
            target: "audit",
            log_type = %entry.log_type,
            module = %entry.module,
            details = %entry.details,
            "{}",
            entry.message
        );
        Ok(())
    }
}

/// Audit sink that POSTs entries as JSON to a webhook.
#[derive(Clone)]
pub struct WebhookAudit {
    webhook: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

impl WebhookAudit {
    pub fn new(webhook: String) -> Self {
        Self {
            webhook,
            client: Client::new(),
            timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }
}

#[async_trait::async_trait]
impl AuditLog for WebhookAudit {
    async fn record(&self, entry: &AuditEntry) -> Result<()> {
        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&self.webhook)
                .timeout(self.timeout)
                .json(entry)
                .send()
                .await;

            match res {
                Ok(rsp) => {
                    if let Err(e) = rsp.error_for_status_ref() {
                        if attempt < self.max_retries {
                            tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1)))
                                .await;
                            continue;
                        }
                        return Err(anyhow!("audit webhook HTTP error: {e}"));
                    }
                    return Ok(());
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                        continue;
                    }
                    return Err(anyhow!("audit webhook request failed: {e}"));
                }
            }
        }
    }
}

/// Records entries in memory; for tests.
#[derive(Default)]
pub struct RecordingAudit {
    entries: std::sync::Mutex<Vec<AuditEntry>>,
}

impl RecordingAudit {
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait::async_trait]
impl AuditLog for RecordingAudit {
    async fn record(&self, entry: &AuditEntry) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry.clone());
        Ok(())
    }
}

/// Always fails; exercises the ignore-audit-failures path in tests.
pub struct FailingAudit;

#[async_trait::async_trait]
impl AuditLog for FailingAudit {
    async fn record(&self, _entry: &AuditEntry) -> Result<()> {
        anyhow::bail!("simulated audit outage")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serializes_with_contract_field_names() {
        let entry = AuditEntry::warning("moderation", "content rejected", "id=abc123");
        let v = serde_json::to_value(&entry).unwrap();
        assert_eq!(v["log_type"], "warning");
        assert_eq!(v["module"], "moderation");
        assert_eq!(v["message"], "content rejected");
        assert_eq!(v["details"], "id=abc123");
    }

    #[tokio::test]
    async fn recording_sink_captures_entries_in_order() {
        let sink = RecordingAudit::default();
        sink.record(&AuditEntry::info("moderation", "a", "")).await.unwrap();
        sink.record(&AuditEntry::warning("moderation", "b", "")).await.unwrap();
        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "a");
        assert_eq!(entries[1].log_type, "warning");
    }

    #[tokio::test]
    async fn tracing_sink_never_fails() {
        assert!(TracingAudit
            .record(&AuditEntry::info("moderation", "ok", ""))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn webhook_failure_surfaces_after_exhausting_retries() {
        // An unparseable URL fails at send time on every attempt; a single
        // allowed attempt means the error comes back without backoff sleeps.
        let sink = WebhookAudit::new("not a url".to_string())
            .with_timeout(1)
            .with_retries(1);
        let err = sink
            .record(&AuditEntry::info("moderation", "noop", ""))
            .await
            .expect_err("unreachable webhook must report failure");
        assert!(err.to_string().contains("audit webhook request failed"));
    }
}
