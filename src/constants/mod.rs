// ABOUTME: Application constants organized by domain
// ABOUTME: Gym limits, wizard defaults, and environment-variable configuration helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! Constants module
//!
//! Application constants grouped by domain: structural limits the
//! orchestrator enforces, wizard defaults, and environment lookups.

use std::env;

/// Structural limits enforced by the orchestrator
pub mod limits {
    /// Hard cap on gyms per user; `submit_name` refuses the fourth gym
    pub const MAX_GYMS_PER_USER: usize = 3;

    /// Minimum gyms that must survive a background reap pass
    pub const MIN_REMAINING_GYMS: usize = 1;

    /// Minimum gyms that must survive a reap pass while a setup is in
    /// progress; the gym switcher must not collapse to a single entry
    pub const MIN_REMAINING_GYMS_DURING_SETUP: usize = 2;
}

/// Wizard defaults
pub mod defaults {
    /// Equipment set inserted by the "apply defaults" wizard option:
    /// a standard commercial-gym loadout
    pub const DEFAULT_EQUIPMENT: &[(&str, u32)] = &[
        ("barbell", 1),
        ("dumbbells", 2),
        ("flat bench", 1),
        ("squat rack", 1),
        ("pull-up bar", 1),
        ("cable machine", 1),
    ];

    /// Bound on the plan-generation call before it is classified as a
    /// deferred failure
    pub const PLAN_SERVICE_TIMEOUT_SECS: u64 = 30;
}

/// Environment-based configuration
pub mod env_config {
    use super::env;
    use super::defaults;

    /// Get database URL from environment or default
    #[must_use]
    pub fn database_url() -> String {
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_owned())
    }

    /// Get log level from environment or default
    #[must_use]
    pub fn log_level() -> String {
        env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned())
    }

    /// Get plan-generation service base URL from environment or default
    #[must_use]
    pub fn plan_service_url() -> String {
        env::var("PLAN_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8090".to_owned())
    }

    /// Get plan-generation timeout from environment or default
    #[must_use]
    pub fn plan_service_timeout_secs() -> u64 {
        env::var("PLAN_SERVICE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults::PLAN_SERVICE_TIMEOUT_SECS)
    }
}

/// Service name used in structured log output
pub mod service_names {
    /// The orchestrator service name
    pub const ORCHESTRATOR: &str = "gymforge-core";
}
