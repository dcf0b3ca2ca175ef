//! Liveness reporting
//!
//! The health check only says the process is up. It does not look at
//! which models loaded, so it stays green even when none did.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Liveness state of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    /// RFC 3339 / ISO-8601 time the check ran, in UTC
    pub timestamp: String,
}

/// Report liveness with the current time
pub fn check() -> HealthStatus {
    HealthStatus {
        status: HealthState::Healthy,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    }
}
