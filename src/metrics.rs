use axum::{routing::get, Router};
use metrics::{describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::lexicon::{Category, Lexicon};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and set the lexicon-size gauges.
    /// Must run once per process, before any counter is touched.
    pub fn init(lexicon: &Lexicon) -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");

        describe_gauge!(
            "moderation_lexicon_negative_terms",
            "Negative lexicon terms loaded at startup."
        );
        describe_gauge!(
            "moderation_lexicon_positive_terms",
            "Positive lexicon terms loaded at startup."
        );

        // Static gauges; the lexicon is immutable for the process lifetime.
        let negative: usize = Category::ALL.iter().map(|&c| lexicon.terms(c).len()).sum();
        gauge!("moderation_lexicon_negative_terms").set(negative as f64);
        gauge!("moderation_lexicon_positive_terms").set(lexicon.positive_terms().len() as f64);

        Self { handle }
    }

    /// Router serving `/metrics` in Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
