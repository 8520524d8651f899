//! Demo client showing cross-service trace correlation.
//!
//! Starts a client span, injects its W3C trace context into a
//! `POST /user/auth` request, and prints the response. When both this client
//! and the server export to the same collector, the password check shows up
//! as a child of the client span.
//!
//! ```bash
//! users-api --seed-demo &
//! downstream
//! ```

use anyhow::Result;
use axum::http::HeaderMap;
use tracing::Instrument;

use users_api::observability::propagation::inject_current_context;
use users_api::observability::tracing::init_tracing;
use users_api::observability::{resource, TelemetryGuard};

#[tokio::main]
async fn main() -> Result<()> {
    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();
    let target =
        std::env::var("USERS_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());

    let tracer_provider = init_tracing("info", endpoint.as_deref(), resource("dev"));
    let meter_provider = users_api::observability::metrics::build_meter_provider(
        None,
        resource("dev"),
    );
    let telemetry = TelemetryGuard::new(tracer_provider, meter_provider);

    let span = tracing::info_span!("call_downstream");
    async {
        let mut headers = HeaderMap::new();
        inject_current_context(&mut headers);

        let client = reqwest::Client::new();
        let response = client
            .post(format!("{target}/user/auth"))
            .headers(headers)
            .form(&[("id", "1"), ("password", "wonderland")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        println!("{status} {body}");

        Ok::<(), anyhow::Error>(())
    }
    .instrument(span)
    .await?;

    telemetry.shutdown();
    Ok(())
}
