// tests/metrics_endpoint.rs
//
// /metrics exposition checks. The Prometheus recorder installs once per
// process, so the router is built once and cached (tokio::sync::OnceCell).

use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use shuttle_axum::axum::{
    body::{self, Body},
    http::Request,
    Router,
};
use tokio::sync::OnceCell;
use tower::ServiceExt as _; // for `oneshot`

use community_moderation::api;
use community_moderation::audit::TracingAudit;
use community_moderation::classify::MockClassifier;
use community_moderation::identity::StaticTokenIdentity;
use community_moderation::lexicon::{Category, Lexicon};
use community_moderation::metrics::Metrics;
use community_moderation::moderation::escalator::Escalator;

static ROUTER: OnceCell<Router> = OnceCell::const_new();

async fn test_app() -> Router {
    ROUTER
        .get_or_init(|| async {
            let lexicon = Arc::new(Lexicon::builtin().clone());
            let metrics = Metrics::init(&lexicon);
            let state = api::AppState {
                lexicon,
                escalator: Arc::new(Escalator::new(
                    Arc::new(MockClassifier::approving()),
                    Duration::from_secs(1),
                )),
                identity: Arc::new(StaticTokenIdentity::with_tokens([(
                    "tok-1",
                    "ana@comunidad.app",
                )])),
                audit: Arc::new(TracingAudit),
            };
            api::create_router(state).merge(metrics.router())
        })
        .await
        .clone()
}

async fn scrape(app: Router) -> String {
    let resp = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn lexicon_gauges_carry_the_loaded_term_counts() {
    let app = test_app().await;
    let text = scrape(app).await;

    // Exposed values must match the lexicon the recorder was set up with,
    // not merely be present as names.
    let lex = Lexicon::builtin();
    let negative: usize = Category::ALL.iter().map(|&c| lex.terms(c).len()).sum();

    let negative_line = format!("moderation_lexicon_negative_terms {negative}");
    assert!(
        text.contains(&negative_line),
        "missing '{negative_line}' in exposition:\n{text}"
    );

    let positive_line = format!(
        "moderation_lexicon_positive_terms {}",
        lex.positive_terms().len()
    );
    assert!(
        text.contains(&positive_line),
        "missing '{positive_line}' in exposition:\n{text}"
    );
}

#[tokio::test]
async fn request_counters_appear_after_a_moderation() {
    let app = test_app().await;

    let req = Request::post("/moderate")
        .header("content-type", "application/json")
        .header("authorization", "Bearer tok-1")
        .body(Body::from(r#"{"content":"eres un idiota"}"#))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let text = scrape(app).await;
    assert!(text.contains("moderation_requests_total"), "no requests counter");
    assert!(text.contains("moderation_rejections_total"), "no rejections counter");
    assert!(
        text.contains(r#"moderation_violations_total{category="offensive"}"#),
        "no labeled violations counter:\n{text}"
    );
}
