// src/config/ai.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_timeout_secs() -> u64 {
    8
}

const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u64> = 1..=30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub enabled: bool,
    /// "openai" (case-insensitive); anything else disables escalation.
    pub provider: String,
    /// Chat model passed to the provider. Defaults to gpt-4o-mini.
    #[serde(default = "default_model")]
    pub model: String,
    /// "ENV" means: read from OPENAI_API_KEY at load time.
    pub api_key: String,
    /// Upper bound for one classifier call. Clamped to 1..=30.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "openai".to_string(),
            model: default_model(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AiConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let cfg: AiConfig = serde_json::from_str(&data)?;
        cfg.sanitize()
    }

    /// Normalize provider, clamp the timeout and resolve the "ENV" key
    /// indirection. Key resolution only happens for an enabled config, so
    /// the shipped default (disabled) loads without any environment set up.
    fn sanitize(mut self) -> anyhow::Result<Self> {
        self.provider = self.provider.to_lowercase();

        self.timeout_secs = self
            .timeout_secs
            .clamp(*TIMEOUT_RANGE_SECS.start(), *TIMEOUT_RANGE_SECS.end());

        if self.enabled && self.api_key.trim().eq_ignore_ascii_case("env") {
            self.api_key = match self.provider.as_str() {
                "openai" => env::var("OPENAI_API_KEY")
                    .map_err(|_| anyhow::anyhow!("Missing OPENAI_API_KEY env var"))?,
                other => anyhow::bail!("Unsupported provider in config: {other}"),
            };
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> AiConfig {
        serde_json::from_str::<AiConfig>(json)
            .unwrap()
            .sanitize()
            .unwrap()
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg = parse(r#"{"enabled": false, "provider": "OpenAI", "api_key": "ENV"}"#);
        assert_eq!(cfg.provider, "openai");
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.timeout_secs, 8);
    }

    #[test]
    fn timeout_is_clamped() {
        let cfg = parse(
            r#"{"enabled": false, "provider": "openai", "api_key": "", "timeout_secs": 600}"#,
        );
        assert_eq!(cfg.timeout_secs, 30);
        let cfg =
            parse(r#"{"enabled": false, "provider": "openai", "api_key": "", "timeout_secs": 0}"#);
        assert_eq!(cfg.timeout_secs, 1);
    }

    #[test]
    fn disabled_config_skips_key_resolution() {
        // Must not error even though no OPENAI_API_KEY is set.
        let cfg = parse(r#"{"enabled": false, "provider": "openai", "api_key": "ENV"}"#);
        assert_eq!(cfg.api_key, "ENV");
    }
}
