//! Startup diagnostics for the escalation classifier.
//!
//! Runs once at boot: loads the classifier config, logs safe facts about it
//! (never the key itself) and, when escalation is enabled, sends one fixed
//! sample through the classifier so a broken key or endpoint shows up in
//! the logs immediately instead of during the first deep check.

use std::time::Duration;

use tracing::{info, warn};

use crate::classify::build_classifier;
use crate::config::ai::AiConfig;

/// Probe sample; deliberately benign community content.
const PROBE_SAMPLE: &str = "Gracias por compartir tu testimonio, fue de mucha bendición.";

/// Load the classifier config from `path` and smoke-test it.
///
/// Errors only when the config itself cannot be loaded. A failing or slow
/// classifier is logged and swallowed: escalations fail open later anyway.
pub async fn quick_probe(path: &str) -> anyhow::Result<()> {
    let cfg = AiConfig::load_from_file(path)?;
    info!(
        provider = %cfg.provider,
        enabled = cfg.enabled,
        key_len = cfg.api_key.len(),
        timeout_secs = cfg.timeout_secs,
        "classifier config loaded"
    );

    if !cfg.enabled {
        info!("escalation disabled, skipping classifier probe");
        return Ok(());
    }

    let classifier = build_classifier(&cfg);
    let outcome = tokio::time::timeout(
        Duration::from_secs(cfg.timeout_secs),
        classifier.classify(PROBE_SAMPLE),
    )
    .await;

    match outcome {
        Ok(Ok(verdict)) => info!(
            provider = classifier.name(),
            appropriate = verdict.is_appropriate,
            "classifier probe ok"
        ),
        Ok(Err(err)) => warn!(
            provider = classifier.name(),
            error = ?err,
            "classifier probe failed"
        ),
        Err(_) => warn!(
            provider = classifier.name(),
            timeout_secs = cfg.timeout_secs,
            "classifier probe timed out"
        ),
    }

    Ok(())
}
