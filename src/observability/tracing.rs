//! OpenTelemetry tracing setup.
//!
//! Configures structured logging with:
//! - W3C Trace Context propagation
//! - Optional OTLP exporter for distributed tracing

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{self as sdktrace, TracerProvider};
use opentelemetry_sdk::Resource;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for this process.
///
/// This sets up:
/// - Console logging with structured format
/// - Environment-based filter (via RUST_LOG)
/// - W3C trace context as the global propagator
/// - An OTLP span exporter when `otel_endpoint` is configured
///
/// Returns the tracer provider when OTLP export is active, so the caller can
/// flush it on shutdown.
///
/// # Panics
///
/// Panics if tracing has already been initialized.
pub fn init_tracing(
    default_directives: &str,
    otel_endpoint: Option<&str>,
    resource: Resource,
) -> Option<TracerProvider> {
    opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_directives},users_api=debug")));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let mut provider = None;
    let mut otlp_error = None;

    let otel_layer = match otel_endpoint {
        Some(endpoint) => match install_otlp_tracer(endpoint, resource) {
            Ok(tracer_provider) => {
                let tracer = tracer_provider.tracer("users-api");
                provider = Some(tracer_provider);
                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            }
            Err(e) => {
                otlp_error = Some((endpoint.to_string(), e));
                None
            }
        },
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .init();

    if provider.is_some() {
        tracing::info!("OTLP trace exporter configured");
    } else if let Some((endpoint, e)) = otlp_error {
        tracing::warn!(endpoint, error = %e, "Failed to create OTLP trace exporter, spans stay local");
    }

    provider
}

/// Build a batch-exporting tracer provider for the given OTLP endpoint.
fn install_otlp_tracer(
    endpoint: &str,
    resource: Resource,
) -> Result<TracerProvider, opentelemetry::trace::TraceError> {
    use opentelemetry_otlp::WithExportConfig;

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(
            sdktrace::Config::default()
                .with_sampler(sdktrace::Sampler::AlwaysOn)
                .with_resource(resource),
        )
        .install_batch(opentelemetry_sdk::runtime::Tokio)
}

/// Initialize tracing for tests (only logs errors).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("error")
        .with_test_writer()
        .try_init();
}
