use crate::config::Config;
use metrics::Unit;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, trace as sdktrace, Resource};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_LOG_FILTER: &str = "ticketgate=debug,tower_http=debug,axum=info";

/// Flushes pending spans when dropped at the end of `main`
pub struct ObservabilityGuard;

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        global::shutdown_tracer_provider();
    }
}

pub fn init(config: &Config) -> Result<ObservabilityGuard, Box<dyn std::error::Error>> {
    init_tracing(config)?;
    init_metrics(config)?;
    Ok(ObservabilityGuard)
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_tracing(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_thread_ids(true)
        .with_target(true);

    let Some(endpoint) = &config.otel_exporter_endpoint else {
        Registry::default()
            .with(log_filter())
            .with(fmt_layer)
            .try_init()?;
        return Ok(());
    };

    // Spans from the upstream client and the use-case layer go out over OTLP too
    let resource = Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        KeyValue::new("upstream.base_url", config.upstream_base_url.clone()),
    ]);

    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(sdktrace::config().with_resource(resource))
        .install_batch(runtime::Tokio)?;

    Registry::default()
        .with(log_filter())
        .with(fmt_layer)
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()?;

    tracing::info!("Exporting traces to {}", endpoint);
    Ok(())
}

/// Prometheus exporter for the upstream call metrics; off unless a port is set
fn init_metrics(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let Some(port) = config.metrics_port else {
        tracing::debug!("METRICS_PORT not set, metrics exporter disabled");
        return Ok(());
    };

    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()?;
    describe_upstream_metrics();

    tracing::info!("Metrics exporter (Prometheus) started on port {}", port);
    Ok(())
}

fn describe_upstream_metrics() {
    metrics::describe_counter!(
        "upstream_requests_total",
        "Calls made to the upstream ticket API, by method and status code"
    );
    metrics::describe_histogram!(
        "upstream_request_duration_seconds",
        Unit::Seconds,
        "Latency of upstream ticket API calls"
    );
    metrics::describe_counter!(
        "upstream_sessions_total",
        "Upstream sessions opened, failed or closed"
    );
}
