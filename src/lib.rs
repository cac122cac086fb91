// ABOUTME: Main library entry point for the GymForge setup orchestration engine
// ABOUTME: Coordinates gym setup flows, abandoned-setup reaping, plan generation and local mirroring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

// Crate-level attributes:
// - deny(unsafe_code): the orchestrator has no FFI surface; nothing here
//   justifies an unsafe block
#![deny(unsafe_code)]

//! # GymForge Core
//!
//! Orchestration engine for multi-gym fitness profiles. A user walks a
//! multi-step wizard to describe a gym (name, equipment, exercise pool,
//! training preferences), an external service generates a workout program
//! for it, and a local mirror keeps a queryable copy of the generated
//! plans. The engine owns everything between the UI and the stores:
//!
//! - **Setup wizard**: a typed state machine over the setup steps, with
//!   side effects executed between transitions
//! - **Reaping**: background and forced cleanup of gyms whose setup was
//!   abandoned partway, without ever deleting a user's last gym
//! - **Active gym**: resolution and repair of the active-gym pointer when
//!   the gym it references goes away
//! - **Plan generation**: coordination of the external generation service
//!   with timeout handling and outcome classification
//! - **Mirroring**: idempotent synchronization of generated plans into a
//!   local cache, with corrective resync on partial failure
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gymforge_core::config::environment::ServerConfig;
//! use gymforge_core::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     // Load configuration
//!     let config = ServerConfig::from_env()?;
//!
//!     println!(
//!         "GymForge orchestrator configured against {}",
//!         config.plan_service.base_url
//!     );
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The crate follows a layered architecture:
//! - **Models**: gyms, profiles, plans, and setup reporting types
//! - **Store**: the authoritative remote store behind the [`store::RemoteStore`] trait
//! - **Cache**: the local plan mirror behind the [`cache::LocalCache`] trait
//! - **Providers**: plan-generation service clients behind [`providers::PlanProvider`]
//! - **Services**: the business rules (reaping, active-gym resolution,
//!   generation, mirroring) as free async functions over the traits
//! - **Setup**: the wizard state machine and its driving controller

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the demo binary (src/bin/) and integration
// tests (tests/). They must remain `pub` so external consumers can access
// them.

/// Local plan mirror abstraction and in-memory backend
pub mod cache;

/// Configuration management from environment variables
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Focused dependency injection context
pub mod context;

/// Unified error handling system with standard error codes
pub mod errors;

/// Logging configuration and structured logging setup
pub mod logging;

/// Core data structures for gyms, profiles, and workout plans
pub mod models;

/// Plan-generation service clients
pub mod providers;

/// Business rules for gym lifecycle, reaping, generation, and mirroring
pub mod services;

/// Setup wizard state machine and controller
pub mod setup;

/// Authoritative remote store abstraction and `SQLite` backend
pub mod store;
