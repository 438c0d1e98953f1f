use std::sync::Arc;
use std::time::Duration;

use shuttle_axum::axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::audit::{self, AuditEntry, DynAuditLog};
use crate::classify::build_classifier;
use crate::config::ai::AiConfig;
use crate::error::ModerationError;
use crate::identity::{DynIdentityProvider, StaticTokenIdentity};
use crate::lexicon::Lexicon;
use crate::moderation::{self, escalator::Escalator};
use crate::verdict::{ModerationRequest, ModerationResult};

#[derive(Clone)]
pub struct AppState {
    pub lexicon: Arc<Lexicon>,
    pub escalator: Arc<Escalator>,
    pub identity: DynIdentityProvider,
    pub audit: DynAuditLog,
}

impl AppState {
    /// Wire the whole service from config files and environment, falling
    /// back to the embedded lexicon and a disabled classifier when the
    /// optional pieces are absent.
    pub fn from_env() -> Self {
        let lexicon = match Lexicon::load() {
            Ok(lex) => lex,
            Err(err) => {
                warn!(error = ?err, "failed to load lexicon override, using embedded default");
                Lexicon::builtin().clone()
            }
        };

        let ai_cfg = match AiConfig::load_from_file("config/ai.json") {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(error = ?err, "failed to load config/ai.json, escalation disabled");
                AiConfig::default()
            }
        };
        let timeout = Duration::from_secs(ai_cfg.timeout_secs);
        let escalator = Escalator::new(build_classifier(&ai_cfg), timeout);

        Self {
            lexicon: Arc::new(lexicon),
            escalator: Arc::new(escalator),
            identity: Arc::new(StaticTokenIdentity::from_env()),
            audit: audit::audit_from_env(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/moderate", post(moderate))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

fn error_response(err: &ModerationError) -> (StatusCode, Json<ErrorBody>) {
    let status = match err {
        ModerationError::Unauthorized => StatusCode::UNAUTHORIZED,
        ModerationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorBody {
            error: err.kind(),
            message: err.to_string(),
        }),
    )
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

async fn moderate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ModerationRequest>,
) -> Result<Json<ModerationResult>, (StatusCode, Json<ErrorBody>)> {
    let Some(caller) = state.identity.resolve(bearer_token(&headers)).await else {
        return Err(error_response(&ModerationError::Unauthorized));
    };

    let result = moderation::moderate(&request, &caller, &state.lexicon, &state.escalator)
        .await
        .map_err(|e| error_response(&e))?;

    audit_verdict(&state.audit, &request, &result).await;

    Ok(Json(result))
}

/// Persist the verdict to the audit channel. Failures are logged and
/// dropped; the caller already has their verdict.
async fn audit_verdict(audit: &DynAuditLog, request: &ModerationRequest, result: &ModerationResult) {
    let id = moderation::anon_hash(&request.content);
    let kinds: Vec<&str> = result.violations.iter().map(|v| v.kind.name()).collect();
    // Anonymized id only, never the content itself.
    let details = format!(
        "id={id} user={} final_score={} violations=[{}]",
        result.user_email,
        result.final_score,
        kinds.join(",")
    );

    let entry = if result.is_approved {
        AuditEntry::info("moderation", "content approved", details)
    } else {
        AuditEntry::warning("moderation", "content rejected", details)
    };

    if let Err(err) = audit.record(&entry).await {
        warn!(error = ?err, "audit log failed, verdict already returned");
    }
}
