//! Caller identity resolution.
//!
//! Moderation never runs for an anonymous caller: a request that cannot be
//! resolved to an identity is rejected at the boundary before any content
//! is inspected. The trait is the seam where a deployment would plug in
//! its own directory or session store; the built-in provider is a static
//! bearer-token table from the environment.

use std::collections::HashMap;
use std::sync::Arc;

/// Comma-separated `token:email` pairs, e.g.
/// `MODERATION_API_TOKENS=abc123:ana@comunidad.app,def456:luis@comunidad.app`.
pub const ENV_API_TOKENS: &str = "MODERATION_API_TOKENS";

/// The authenticated caller on whose behalf a check runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub email: String,
}

impl CallerIdentity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer token into a caller identity. `None` means the
    /// caller is unauthorized.
    async fn resolve(&self, token: Option<&str>) -> Option<CallerIdentity>;
}

pub type DynIdentityProvider = Arc<dyn IdentityProvider>;

/// Static token table sourced from [`ENV_API_TOKENS`].
pub struct StaticTokenIdentity {
    tokens: HashMap<String, String>,
}

impl StaticTokenIdentity {
    pub fn from_env() -> Self {
        let raw = std::env::var(ENV_API_TOKENS).unwrap_or_default();
        let provider = Self::parse(&raw);
        if provider.tokens.is_empty() {
            tracing::warn!(
                "no API tokens configured ({}), every request will be unauthorized",
                ENV_API_TOKENS
            );
        }
        provider
    }

    pub fn with_tokens<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            tokens: pairs
                .into_iter()
                .map(|(token, email)| (token.into(), email.into()))
                .collect(),
        }
    }

    /// Parse `token:email` pairs; malformed entries are skipped.
    fn parse(raw: &str) -> Self {
        let tokens = raw
            .split(',')
            .filter_map(|entry| {
                let (token, email) = entry.split_once(':')?;
                let (token, email) = (token.trim(), email.trim());
                if token.is_empty() || email.is_empty() {
                    return None;
                }
                Some((token.to_string(), email.to_string()))
            })
            .collect();
        Self { tokens }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for StaticTokenIdentity {
    async fn resolve(&self, token: Option<&str>) -> Option<CallerIdentity> {
        let token = token?.trim();
        if token.is_empty() {
            return None;
        }
        self.tokens
            .get(token)
            .map(|email| CallerIdentity::new(email.as_str()))
    }
}
