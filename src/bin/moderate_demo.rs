//! Demo that runs a few sample messages through the pipeline (rule pass
//! only; escalation uses whatever MODERATION_AI_TEST_MODE selects).

use std::sync::Arc;
use std::time::Duration;

use community_moderation::classify::build_classifier;
use community_moderation::config::ai::AiConfig;
use community_moderation::identity::CallerIdentity;
use community_moderation::moderation::{self, escalator::Escalator};
use community_moderation::{Lexicon, ModerationRequest};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let lexicon = Lexicon::builtin();
    let cfg = AiConfig::default();
    let escalator = Escalator::new(build_classifier(&cfg), Duration::from_secs(cfg.timeout_secs));
    let escalator = Arc::new(escalator);
    let caller = CallerIdentity::new("demo@comunidad.app");

    let samples = [
        "Gracias por tu testimonio, qué bendición",
        "eres un idiota",
        "hablemos de guerra y violencia",
        "Los invito a la oración del viernes",
    ];

    for content in samples {
        let req = ModerationRequest::basic(content);
        match moderation::moderate(&req, &caller, lexicon, &escalator).await {
            Ok(result) => println!(
                "approved={} final_score={} violations={} warnings={}",
                result.is_approved,
                result.final_score,
                result.violations.len(),
                result.warnings.len()
            ),
            Err(err) => println!("error: {err}"),
        }
    }

    println!("moderate-demo done");
}
