// ABOUTME: Domain service layer for gym setup orchestration business logic
// ABOUTME: Protocol-agnostic services shared by the wizard flow and management screens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! Domain service layer
//!
//! Business logic independent of any surface: the wizard flow drives these
//! services, and the same functions back the management screens (gym
//! switcher, rename, explicit delete). Services take their collaborators
//! as trait references and return [`crate::errors::AppResult`] at the
//! boundary.

/// Active-gym pointer resolution when a gym goes away
pub mod active_gym;

/// Derived gym completeness checks
pub mod completeness;

/// Explicit gym management: rename, delete, switch active, list with status
pub mod gyms;

/// Local plan mirror synchronization and corrective resync
pub mod mirror;

/// Plan-generation coordination and outcome classification
pub mod plan_generation;

/// Profile read and update helpers
pub mod profiles;

/// Incomplete-gym cleanup passes
pub mod reaper;
