use emf_structured_metrics::{EmbeddedMetric, Unit};
use serde_json::json;
use std::time::Instant;
use tracing::info;

fn main() {
    // Diagnostics go to stderr, stdout carries only metric records
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .init();

    let start = Instant::now();
    let mut metric = EmbeddedMetric::with_properties([("service", json!("orders"))]);

    let requests = metric.new_metric_directive("MetricsExample", [("Method", "Default")]);
    metric[requests]
        .put_metric("requests", 1, Unit::Count)
        .put_dimension("Stage", std::env::var("STAGE").unwrap_or_else(|_| "dev".into()));

    let payload = metric.new_metric_directive("MetricsExample/Payload", [("Method", "Default")]);
    metric[payload].put_metric("PayloadSize", 1536, Unit::Bytes);

    info!("publishing example record");

    let elapsed = start.elapsed().as_secs_f64() * 1000.0;
    metric.publish([("requestId", json!("4bd2d365-3792-46c8-9b6c-6132f9630fbb")), ("elapsedMs", json!(elapsed))]);
}
