//! Password verification and outcome classification.
//!
//! The comparison primitive is bcrypt, a deliberately slow adaptive hash, so
//! its latency distribution is a leading indicator of load and of a
//! misconfigured work factor. Every call emits exactly one latency
//! observation through the injected telemetry sink, whatever the outcome.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::observability::metrics::AuthTelemetry;
use crate::storage::UserRecord;

/// A well-formed bcrypt hash compared against when an account has no password
/// set, so the absent-hash path pays the same adaptive-hash cost as a genuine
/// mismatch. The comparison result is discarded.
const ABSENT_HASH_PLACEHOLDER: &str =
    "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

/// Classification of a verification outcome.
///
/// A plain mismatch is an expected outcome; only a malformed stored hash is
/// an operational error and feeds the error counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorClass {
    /// The submitted credential matched.
    None,
    /// Well-formed stored hash, wrong credential.
    Mismatch,
    /// The stored hash is structurally invalid for the verifier.
    MalformedHash,
}

/// Result of a single verification call.
///
/// Created fresh per call, consumed by telemetry emission and the HTTP
/// response mapping, never persisted.
#[derive(Debug, Clone, Copy)]
pub struct AuthOutcome {
    pub matched: bool,
    pub latency: Duration,
    pub error_class: AuthErrorClass,
}

/// Stateless authentication check over fetched user records.
#[derive(Clone)]
pub struct Authenticator {
    telemetry: Arc<dyn AuthTelemetry>,
}

impl Authenticator {
    /// Create an authenticator emitting into the given telemetry sink.
    pub fn new(telemetry: Arc<dyn AuthTelemetry>) -> Self {
        Self { telemetry }
    }

    /// Verify a submitted plaintext credential against a fetched record.
    ///
    /// Emits exactly one latency observation per call, tagged with the match
    /// result, and increments the error counter only when the stored hash is
    /// malformed. Never panics; an account without a password is an
    /// unconditional mismatch.
    pub fn verify(&self, record: &UserRecord, password: &str) -> AuthOutcome {
        let span = tracing::info_span!("password_check");
        let _guard = span.enter();

        let (stored, absent) = match record.credential_hash.as_deref() {
            Some(bytes) => (bytes, false),
            None => (ABSENT_HASH_PLACEHOLDER.as_bytes(), true),
        };

        // The comparison cost is dominated by the adaptive work factor, so
        // the timer wraps exactly this primitive and nothing else.
        let start = Instant::now();
        let verdict = match std::str::from_utf8(stored) {
            Ok(encoded) => bcrypt::verify(password, encoded).ok(),
            Err(_) => None,
        };
        let latency = start.elapsed();

        let (matched, error_class) = if absent {
            (false, AuthErrorClass::Mismatch)
        } else {
            match verdict {
                Some(true) => (true, AuthErrorClass::None),
                Some(false) => (false, AuthErrorClass::Mismatch),
                None => (false, AuthErrorClass::MalformedHash),
            }
        };

        self.telemetry.record_check(latency.as_secs_f64(), matched);

        if error_class == AuthErrorClass::MalformedHash {
            self.telemetry.record_malformed_hash();
            tracing::warn!(user.id = record.id, "Stored credential hash is malformed");
        }

        AuthOutcome {
            matched,
            latency,
            error_class,
        }
    }
}
