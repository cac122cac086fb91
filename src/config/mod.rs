// ABOUTME: Configuration management for the orchestrator
// ABOUTME: Environment-driven server configuration with typed sub-configs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! Configuration management
//!
//! All runtime configuration is environment-driven; [`environment::ServerConfig::from_env`]
//! is the single entry point.

/// Environment-based configuration loading
pub mod environment;

pub use environment::{DatabaseConfig, LogLevel, PlanServiceConfig, ServerConfig};
