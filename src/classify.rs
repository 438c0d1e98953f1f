//! External content classifier used by the deep-check escalation pass.
//!
//! The provider judges a message against a fixed community policy and
//! answers with a strict JSON verdict. Everything here returns `Result`:
//! callers treat any error (network, HTTP status, malformed verdict) as an
//! escalation failure and keep the rule-based outcome.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::ai::AiConfig;

/// Test hook: `approve` | `reject` | `error` forces a deterministic
/// classifier regardless of config.
pub const ENV_AI_TEST_MODE: &str = "MODERATION_AI_TEST_MODE";

/// Fixed policy prompt sent with every classification request. The verdict
/// fields come back in Spanish because that is what the API surfaces.
const POLICY_PROMPT: &str = "You are the content moderator of a Spanish-speaking faith community. \
Judge whether the user's message is appropriate to publish. The community rejects insults and \
offensive language, hate speech or discrimination of any kind, divisive debates (religion, \
politics, war, violence, drugs, gambling) and sexually explicit content. It welcomes respectful \
testimonies, praise, gratitude, prayer requests, scripture-grounded teaching and encouraging \
messages. Respond ONLY with a JSON object, no prose and no code fences: \
{\"is_appropriate\": true|false, \"reason\": \"<short reason in Spanish>\", \
\"suggestion\": \"<optional rewording advice in Spanish>\"}";

/// Verdict returned by a classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifierVerdict {
    pub is_appropriate: bool,
    pub reason: String,
    #[serde(default)]
    pub suggestion: Option<String>,
}

/// Trait object used by the escalator (and tests).
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, content: &str) -> Result<ClassifierVerdict>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynClassifier = Arc<dyn Classifier>;

/// Factory: build a classifier according to config and environment.
///
/// * `MODERATION_AI_TEST_MODE=approve|reject|error` forces a deterministic
///   test double.
/// * Else if `config.enabled == false`, returns the disabled classifier.
/// * Else builds the real provider (OpenAI).
pub fn build_classifier(config: &AiConfig) -> DynClassifier {
    match std::env::var(ENV_AI_TEST_MODE).as_deref() {
        Ok("approve") => return Arc::new(MockClassifier::approving()),
        Ok("reject") => return Arc::new(MockClassifier::rejecting()),
        Ok("error") => return Arc::new(FailingClassifier),
        _ => {}
    }

    if !config.enabled {
        return Arc::new(DisabledClassifier);
    }

    match config.provider.as_str() {
        "openai" => Arc::new(OpenAiClassifier::new(config)),
        other => {
            tracing::warn!(provider = other, "unknown classifier provider, escalation disabled");
            Arc::new(DisabledClassifier)
        }
    }
}

/// OpenAI classifier (Chat Completions API). Requires a resolved API key.
pub struct OpenAiClassifier {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiClassifier {
    pub fn new(config: &AiConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("community-moderation/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait::async_trait]
impl Classifier for OpenAiClassifier {
    async fn classify(&self, content: &str) -> Result<ClassifierVerdict> {
        if self.api_key.is_empty() {
            anyhow::bail!("classifier api key is empty");
        }

        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: POLICY_PROMPT,
                },
                Msg {
                    role: "user",
                    content,
                },
            ],
            temperature: 0.0,
            max_tokens: 200,
        };

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("sending classifier request")?
            .error_for_status()
            .context("classifier returned an error status")?;

        let body: Resp = resp.json().await.context("reading classifier response")?;
        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or("");
        parse_verdict(content)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Parse the model's reply into a verdict, tolerating Markdown code fences
/// but nothing else. Anything unparsable is an error, never a guess.
fn parse_verdict(raw: &str) -> Result<ClassifierVerdict> {
    let trimmed = strip_code_fence(raw.trim());
    serde_json::from_str(trimmed).with_context(|| format!("malformed classifier verdict: {raw:?}"))
}

fn strip_code_fence(s: &str) -> &str {
    let Some(inner) = s.strip_prefix("```") else {
        return s;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Always errors; used when escalation is switched off in config. The
/// escalator handles the error like any other failure and keeps the
/// rule-based verdict.
pub struct DisabledClassifier;

#[async_trait::async_trait]
impl Classifier for DisabledClassifier {
    async fn classify(&self, _content: &str) -> Result<ClassifierVerdict> {
        anyhow::bail!("classifier disabled in config")
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic classifier for tests and local runs.
#[derive(Clone)]
pub struct MockClassifier {
    pub fixed: ClassifierVerdict,
}

impl MockClassifier {
    pub fn approving() -> Self {
        Self {
            fixed: ClassifierVerdict {
                is_appropriate: true,
                reason: "El mensaje es apropiado (mock)".to_string(),
                suggestion: None,
            },
        }
    }

    pub fn rejecting() -> Self {
        Self {
            fixed: ClassifierVerdict {
                is_appropriate: false,
                reason: "El mensaje contiene contenido inapropiado (mock)".to_string(),
                suggestion: Some("Reformula tu mensaje con un tono más amable.".to_string()),
            },
        }
    }
}

#[async_trait::async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, _content: &str) -> Result<ClassifierVerdict> {
        Ok(self.fixed.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Always fails; exercises the fail-open path in tests.
pub struct FailingClassifier;

#[async_trait::async_trait]
impl Classifier for FailingClassifier {
    async fn classify(&self, _content: &str) -> Result<ClassifierVerdict> {
        anyhow::bail!("simulated classifier outage")
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
