//! OpenTelemetry observability infrastructure.
//!
//! Provides:
//! - Structured tracing with optional OTLP export
//! - Metric instruments for the password-check path
//! - W3C trace context propagation over HTTP headers

pub mod metrics;
pub mod propagation;
pub mod tracing;

use opentelemetry::KeyValue;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::Resource;

/// Build the telemetry resource describing this service instance.
pub fn resource(environment: &str) -> Resource {
    Resource::new([
        KeyValue::new("service.name", "users-api"),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        KeyValue::new("deployment.environment", environment.to_string()),
    ])
}

/// Handle that owns the telemetry providers for the lifetime of the process.
///
/// Shuts both providers down when dropped, so spans and metrics are flushed
/// on every exit path. Flush failures are logged, never fatal.
pub struct TelemetryGuard {
    tracer_provider: Option<TracerProvider>,
    meter_provider: Option<SdkMeterProvider>,
}

impl TelemetryGuard {
    /// Create a guard over the given providers.
    ///
    /// `tracer_provider` is `None` when no OTLP endpoint is configured and
    /// spans stay process-local.
    pub fn new(
        tracer_provider: Option<TracerProvider>,
        meter_provider: SdkMeterProvider,
    ) -> Self {
        Self {
            tracer_provider,
            meter_provider: Some(meter_provider),
        }
    }

    /// Flush and shut down the providers.
    pub fn shutdown(mut self) {
        self.shutdown_providers();
    }

    fn shutdown_providers(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(e) = provider.shutdown() {
                ::tracing::warn!(error = %e, "Failed to shut down tracer provider");
            }
        }
        if let Some(provider) = self.meter_provider.take() {
            if let Err(e) = provider.shutdown() {
                ::tracing::warn!(error = %e, "Failed to shut down meter provider");
            }
        }
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        self.shutdown_providers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry_sdk::metrics::ManualReader;

    #[test]
    fn test_resource_carries_service_identity() {
        let res = resource("test");
        let service_name = res
            .iter()
            .find(|(k, _)| k.as_str() == "service.name")
            .map(|(_, v)| v.to_string());
        assert_eq!(service_name.as_deref(), Some("users-api"));
    }

    #[test]
    fn test_guard_shutdown_is_safe_without_tracer() {
        let reader = ManualReader::builder().build();
        let provider = SdkMeterProvider::builder().with_reader(reader).build();
        let guard = TelemetryGuard::new(None, provider);
        guard.shutdown();
    }
}
