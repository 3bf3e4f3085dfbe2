//! Setup-time errors.
//!
//! The per-tick AI never fails: missing collaborators and unknown states
//! degrade behavior instead. Only loading and wiring data can be rejected.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field}: minimum {min} exceeds maximum {max}")]
    InvalidRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("waypoint network `{0}` has no waypoints")]
    EmptyWaypointNetwork(String),
}
