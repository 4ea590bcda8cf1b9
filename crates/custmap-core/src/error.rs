//! Error types for Custmap

use std::path::PathBuf;
use thiserror::Error;

use crate::models::FormErrors;

#[derive(Debug, Error)]
pub enum CustmapError {
    // Capability errors
    #[error("Permission denied for {capability}")]
    PermissionDenied { capability: String },

    #[error("Position unavailable: {reason}")]
    PositionUnavailable { reason: String },

    #[error("Cancelled by user")]
    UserCancelled,

    // Gateway errors
    #[error("Service unavailable: {reason}")]
    ServiceUnavailable { reason: String },

    #[error("No geocoding results for {query}")]
    NotFound { query: String },

    #[error("{operation} timed out after {after_ms}ms")]
    Timeout { operation: String, after_ms: u64 },

    #[error("Result for request {token} superseded by request {latest}")]
    StaleResult { token: u64, latest: u64 },

    // Domain errors
    #[error("Invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Invalid map region: {reason}")]
    InvalidRegion { reason: String },

    #[error("Customer not found: {id}")]
    CustomerNotFound { id: String },

    #[error("Validation failed: {0}")]
    Validation(FormErrors),

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    #[error("Config file not found at {path}")]
    ConfigFileNotFound { path: PathBuf },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CustmapError {
    /// Failures of an external collaborator.
    ///
    /// These are logged at the call site and degrade to "no state change";
    /// they never propagate past the component that issued the call.
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            CustmapError::PermissionDenied { .. }
                | CustmapError::PositionUnavailable { .. }
                | CustmapError::UserCancelled
                | CustmapError::ServiceUnavailable { .. }
                | CustmapError::NotFound { .. }
                | CustmapError::Timeout { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CustmapError>;
