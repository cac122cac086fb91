// ABOUTME: Unified error handling for the GymForge setup orchestrator
// ABOUTME: Defines error codes, context attachment, and HTTP mapping for the embedding API layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! # Unified Error Handling System
//!
//! Centralized error types for the orchestrator. Every service boundary
//! returns [`AppResult`]; store and provider internals use `anyhow` and are
//! converted at the boundary. The code taxonomy mirrors the failure classes
//! the wizard distinguishes: validation (surfaced inline, no side effects),
//! missing prerequisites (flow redirect), transient remote failures (fail
//! open, never delete), generation failures (finish deferred), and sync
//! failures (corrective resync, never user-blocking).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Standard error codes used throughout the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (1000-1999)
    /// Input rejected before any side effect was attempted
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 1000,
    /// A required field is absent
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 1001,
    /// The per-user gym cap is already reached
    #[serde(rename = "GYM_CAP_REACHED")]
    GymCapReached = 1002,

    // Flow prerequisites (2000-2999)
    /// Profile fields needed by plan generation are absent
    #[serde(rename = "PREREQUISITE_MISSING")]
    PrerequisiteMissing = 2000,

    // Resource management (3000-3999)
    /// The referenced gym, plan, or profile does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 3000,
    /// Deleting the gym would leave the user with none
    #[serde(rename = "GYM_FLOOR_VIOLATION")]
    GymFloorViolation = 3001,
    /// The gym is owned by a different user
    #[serde(rename = "NOT_OWNER")]
    NotOwner = 3002,

    // Remote store (4000-4999)
    /// A read against the authoritative store failed; callers fail open
    #[serde(rename = "TRANSIENT_REMOTE")]
    TransientRemote = 4000,
    /// A write against the authoritative store failed
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 4001,

    // External generation service (5000-5999)
    /// The plan-generation service rejected the request or was unreachable
    #[serde(rename = "GENERATION_FAILED")]
    GenerationFailed = 5000,

    // Local mirror (6000-6999)
    /// A local-cache upsert failed; a corrective resync was scheduled
    #[serde(rename = "SYNC_FAILED")]
    SyncFailed = 6000,
    /// A copy-from-gym flow persisted only part of the requested data
    #[serde(rename = "PARTIAL_COPY")]
    PartialCopy = 6001,

    // Configuration (7000-7999)
    /// Configuration is missing or invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 7000,

    // Internal (9000-9999)
    /// Unclassified internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Serialization or deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9001,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidInput | Self::MissingRequiredField => 400,

            // 403 Forbidden
            Self::NotOwner => 403,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 409 Conflict
            Self::GymCapReached | Self::GymFloorViolation => 409,

            // 412 Precondition Failed
            Self::PrerequisiteMissing => 412,

            // 502 Bad Gateway
            Self::GenerationFailed | Self::PartialCopy => 502,

            // 503 Service Unavailable
            Self::TransientRemote => 503,

            // 500 Internal Server Error
            Self::DatabaseError
            | Self::SyncFailed
            | Self::ConfigError
            | Self::InternalError
            | Self::SerializationError => 500,
        }
    }

    /// Get a user-facing description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing",
            Self::GymCapReached => "The maximum number of gyms has been reached",
            Self::PrerequisiteMissing => "Profile information required for this step is missing",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::GymFloorViolation => "The last remaining gym cannot be deleted",
            Self::NotOwner => "The resource belongs to a different user",
            Self::TransientRemote => "The remote store is temporarily unreachable",
            Self::DatabaseError => "A remote store operation failed",
            Self::GenerationFailed => "Workout plan generation failed",
            Self::SyncFailed => "Synchronizing the local plan cache failed",
            Self::PartialCopy => "Only part of the source gym could be copied",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal error occurred",
            Self::SerializationError => "Data serialization failed",
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Owner whose data was being touched
    pub user_id: Option<Uuid>,
    /// Gym involved in the failing operation
    pub gym_id: Option<Uuid>,
    /// Additional key-value context
    #[serde(skip_serializing_if = "serde_json::Value::is_null", default)]
    pub details: serde_json::Value,
}

/// Unified error type for the orchestrator
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Attach the owner involved in the failing operation
    #[must_use]
    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.context.user_id = Some(user_id);
        self
    }

    /// Attach the gym involved in the failing operation
    #[must_use]
    pub fn with_gym_id(mut self, gym_id: Uuid) -> Self {
        self.context.gym_id = Some(gym_id);
        self
    }

    /// Attach structured details
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Attach a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for service boundaries
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors for common errors
impl AppError {
    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required field absent
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("required field '{field}' is missing"),
        )
    }

    /// Per-user gym cap reached
    #[must_use]
    pub fn gym_cap_reached(cap: usize) -> Self {
        Self::new(
            ErrorCode::GymCapReached,
            format!("a user may own at most {cap} gyms"),
        )
    }

    /// Profile fields needed by generation are absent
    #[must_use]
    pub fn prerequisite_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PrerequisiteMissing, message)
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Refused deletion of the last remaining gym
    #[must_use]
    pub fn gym_floor(gym_id: Uuid) -> Self {
        Self::new(
            ErrorCode::GymFloorViolation,
            "refusing to delete the only remaining gym",
        )
        .with_gym_id(gym_id)
    }

    /// Resource owned by a different user
    #[must_use]
    pub fn not_owner(gym_id: Uuid) -> Self {
        Self::new(ErrorCode::NotOwner, "gym belongs to a different user").with_gym_id(gym_id)
    }

    /// Transient remote-store read failure
    #[must_use]
    pub fn transient_remote(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TransientRemote, message)
    }

    /// Remote-store write failure
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Plan-generation service failure
    #[must_use]
    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GenerationFailed, message)
    }

    /// Local-mirror write failure
    #[must_use]
    pub fn sync_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SyncFailed, message)
    }

    /// Partial copy from a source gym
    #[must_use]
    pub fn partial_copy(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PartialCopy, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// Conversion from `anyhow::Error` (store and provider internals)
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.source() {
            Some(source) => Self::new(ErrorCode::DatabaseError, error.to_string()).with_details(
                serde_json::json!({
                    "source": source.to_string()
                }),
            ),
            None => Self::new(ErrorCode::DatabaseError, error.to_string()),
        }
    }
}

/// Conversion from serde failures
impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::GymCapReached.http_status(), 409);
        assert_eq!(ErrorCode::PrerequisiteMissing.http_status(), 412);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::TransientRemote.http_status(), 503);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_app_error_context() {
        let gym_id = Uuid::new_v4();
        let error = AppError::gym_cap_reached(3).with_gym_id(gym_id);

        assert_eq!(error.code, ErrorCode::GymCapReached);
        assert_eq!(error.context.gym_id, Some(gym_id));
        assert!(error.message.contains('3'));
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::GymFloorViolation).unwrap();
        assert_eq!(json, "\"GYM_FLOOR_VIOLATION\"");
    }

    #[test]
    fn test_display_includes_description() {
        let error = AppError::not_found("gym");
        let rendered = error.to_string();
        assert!(rendered.contains("was not found"));
        assert!(rendered.contains("gym not found"));
    }
}
