// ABOUTME: Structured error types for plan-generation service operations
// ABOUTME: Typed error codes with a substring compatibility shim for bare-message providers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

use serde::{Deserialize, Serialize};

/// Bare-message marker some deployed service versions still send instead
/// of a structured code
const NOTHING_TO_COPY_MARKER: &str = "does not have any workouts to copy";

/// Structured error codes the plan service reports
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanServiceErrorCode {
    /// The copy source gym has no child workouts
    NoWorkoutsToCopy,
    /// The request was malformed or referenced unknown resources
    InvalidRequest,
    /// The service is up but refused the call (overload, maintenance)
    ServiceUnavailable,
    /// Unclassified service-side failure
    Internal,
}

/// Error returned by a plan-generation provider
///
/// `code` is the structured classification; providers that predate the
/// structured contract send only `message`, which
/// [`is_nothing_to_copy`](Self::is_nothing_to_copy) still recognizes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("plan service error: {message}")]
pub struct PlanServiceError {
    /// Structured error code, when the service sent one
    pub code: Option<PlanServiceErrorCode>,
    /// Human-readable detail
    pub message: String,
}

impl PlanServiceError {
    /// Error with a structured code
    #[must_use]
    pub fn new(code: PlanServiceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// Error carrying only a bare message (legacy service versions,
    /// transport failures)
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Transport-level failure reaching the service
    #[must_use]
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            code: Some(PlanServiceErrorCode::ServiceUnavailable),
            message: message.into(),
        }
    }

    /// Whether this error means "the source gym has no workouts"
    ///
    /// Checks the structured code first; the message-substring match is a
    /// compatibility shim for providers that send bare messages.
    #[must_use]
    pub fn is_nothing_to_copy(&self) -> bool {
        if self.code == Some(PlanServiceErrorCode::NoWorkoutsToCopy) {
            return true;
        }
        self.code.is_none() && self.message.contains(NOTHING_TO_COPY_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_code_recognized() {
        let error = PlanServiceError::new(PlanServiceErrorCode::NoWorkoutsToCopy, "empty source");
        assert!(error.is_nothing_to_copy());
    }

    #[test]
    fn test_bare_message_shim_recognized() {
        let error = PlanServiceError::from_message(
            "Gym 'Home' does not have any workouts to copy",
        );
        assert!(error.is_nothing_to_copy());
    }

    #[test]
    fn test_other_errors_not_matched() {
        let error = PlanServiceError::new(PlanServiceErrorCode::Internal, "boom");
        assert!(!error.is_nothing_to_copy());

        let bare = PlanServiceError::from_message("connection reset");
        assert!(!bare.is_nothing_to_copy());
    }

    #[test]
    fn test_structured_code_wins_over_message() {
        // A structured code takes precedence; the shim only applies to
        // codeless errors
        let error = PlanServiceError::new(
            PlanServiceErrorCode::Internal,
            "gym does not have any workouts to copy",
        );
        assert!(!error.is_nothing_to_copy());
    }

    #[test]
    fn test_code_wire_names() {
        let json = serde_json::to_string(&PlanServiceErrorCode::NoWorkoutsToCopy).unwrap();
        assert_eq!(json, "\"no_workouts_to_copy\"");
    }
}
