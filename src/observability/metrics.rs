//! Metric instruments for the password-check path.
//!
//! Key metrics:
//! - user.auth.password_check.latency: Histogram of hash comparison latency
//! - user.auth.password_check.errors: Counter of malformed stored hashes
//!
//! The latency histogram is tagged only with the boolean match result. The
//! user identifier must never appear in metric attributes: every distinct
//! value would become its own time series at the aggregation layer.

use opentelemetry::metrics::{Counter, Histogram, Meter};
use opentelemetry::KeyValue;
use opentelemetry_sdk::metrics::{ManualReader, SdkMeterProvider};
use opentelemetry_sdk::Resource;

/// Telemetry sink consumed by the authentication check.
///
/// Implemented by [`AuthMetrics`] for production and by recording doubles in
/// tests, so the emission contract (one latency observation per call, error
/// counter only on malformed hashes) is directly testable.
pub trait AuthTelemetry: Send + Sync {
    /// Record one hash comparison latency observation, in seconds.
    fn record_check(&self, latency_seconds: f64, matched: bool);

    /// Record one malformed stored credential hash.
    fn record_malformed_hash(&self);
}

/// Password-check metrics backed by OpenTelemetry instruments.
#[derive(Debug)]
pub struct AuthMetrics {
    /// Histogram of password hash comparison latency in seconds.
    check_latency: Histogram<f64>,
    /// Counter of malformed stored credential hashes.
    check_errors: Counter<u64>,
}

impl AuthMetrics {
    /// Create the password-check instruments from a meter.
    pub fn new(meter: &Meter) -> Self {
        Self {
            check_latency: meter
                .f64_histogram("user.auth.password_check.latency")
                .with_description("Latency of the password hash comparison")
                .with_unit("s")
                .init(),
            check_errors: meter
                .u64_counter("user.auth.password_check.errors")
                .with_description("Malformed stored credential hashes seen during verification")
                .with_unit("1")
                .init(),
        }
    }
}

/// Attribute set for a latency observation.
///
/// Only the match result is allowed here; see the module docs on cardinality.
pub(crate) fn check_attributes(matched: bool) -> [KeyValue; 1] {
    [KeyValue::new("correct", matched)]
}

impl AuthTelemetry for AuthMetrics {
    fn record_check(&self, latency_seconds: f64, matched: bool) {
        self.check_latency
            .record(latency_seconds, &check_attributes(matched));
    }

    fn record_malformed_hash(&self) {
        self.check_errors.add(1, &[]);
    }
}

/// Build the meter provider for this process.
///
/// Uses an OTLP gRPC exporter when an endpoint is configured; otherwise a
/// manual reader, so metrics are recorded but not exported.
pub fn build_meter_provider(otel_endpoint: Option<&str>, resource: Resource) -> SdkMeterProvider {
    if let Some(endpoint) = otel_endpoint {
        use opentelemetry_otlp::{Protocol, WithExportConfig};

        let exporter = opentelemetry_otlp::new_exporter()
            .tonic()
            .with_endpoint(endpoint)
            .with_protocol(Protocol::Grpc);

        match opentelemetry_otlp::new_pipeline()
            .metrics(opentelemetry_sdk::runtime::Tokio)
            .with_exporter(exporter)
            .with_resource(resource.clone())
            .with_period(std::time::Duration::from_secs(10))
            .build()
        {
            Ok(provider) => {
                tracing::info!(endpoint, "OTLP metrics exporter configured");
                return provider;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create OTLP metrics exporter, metrics stay local");
            }
        }
    }

    let reader = ManualReader::builder().build();
    SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(resource)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::metrics::MeterProvider as _;

    fn test_metrics() -> (SdkMeterProvider, AuthMetrics) {
        let reader = ManualReader::builder().build();
        let provider = SdkMeterProvider::builder().with_reader(reader).build();
        let metrics = AuthMetrics::new(&provider.meter("users-api-test"));
        (provider, metrics)
    }

    #[test]
    fn test_record_check() {
        let (_provider, metrics) = test_metrics();
        // Should not panic
        metrics.record_check(0.25, true);
        metrics.record_check(0.25, false);
    }

    #[test]
    fn test_record_malformed_hash() {
        let (_provider, metrics) = test_metrics();
        // Should not panic
        metrics.record_malformed_hash();
    }

    #[test]
    fn test_check_attributes_carry_only_match_result() {
        for matched in [true, false] {
            let attrs = check_attributes(matched);
            let keys: Vec<&str> = attrs.iter().map(|kv| kv.key.as_str()).collect();
            assert_eq!(keys, vec!["correct"]);
        }
    }

    #[test]
    fn test_check_attributes_exclude_identifier() {
        let attrs = check_attributes(true);
        for kv in &attrs {
            let key = kv.key.as_str();
            assert_ne!(key, "user_id");
            assert_ne!(key, "user.id");
            assert_ne!(key, "id");
        }
    }
}
