use anyhow::Result;
use axum::extract::MatchedPath;
use axum::http::Request;
use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, Span};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use super::config::Config;

/// Installs the global subscriber. Spans are exported over OTLP only when
/// an endpoint is configured.
pub fn init(config: &Config) -> Result<()> {
    let telemetry_layer = match config.otlp_endpoint() {
        Some(endpoint) => {
            let tracer = opentelemetry_otlp::new_pipeline()
                .tracing()
                .with_exporter(opentelemetry_otlp::new_exporter().tonic().with_endpoint(endpoint))
                .install_batch(opentelemetry_sdk::runtime::Tokio)?;

            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    let fmt_layer = tracing_subscriber::fmt::layer();
    tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(fmt_layer)
        .with(EnvFilter::try_new(config.log_level())?)
        .try_init()?;

    info!(otlp_endpoint = config.otlp_endpoint(), "telemetry initialized");
    Ok(())
}

pub fn shutdown() {
    global::shutdown_tracer_provider();
}

type TraceMiddleware<B> = TraceLayer<SharedClassifier<ServerErrorsAsFailures>, fn(&Request<B>) -> Span>;

pub(crate) fn tracing_middleware<B>() -> TraceMiddleware<B> {
    TraceLayer::new_for_http().make_span_with(make_span)
}

fn make_span<B>(request: &Request<B>) -> Span {
    // Matched route with placeholders, not the raw uri.
    let matched_path = request.extensions().get::<MatchedPath>().map(MatchedPath::as_str);

    info_span!(
        "http_request",
        method = ?request.method(),
        matched_path,
    )
}
