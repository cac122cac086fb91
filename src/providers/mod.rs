// ABOUTME: Plan-generation service integrations for workout program creation
// ABOUTME: Unifies the HTTP service and the scripted provider behind one contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! # Plan Generation Providers
//!
//! The external workout-plan generation service, abstracted behind
//! [`PlanProvider`]. The service owns program construction; the
//! orchestrator only hands it the gym context and preferences and reads
//! the resulting plan rows back from the remote store.
//!
//! Two implementations ship: [`http::HttpPlanProvider`] for the real
//! service and [`scripted::ScriptedPlanProvider`] for development,
//! demos, and tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ProgramType, SessionLength};

pub mod errors;
pub mod http;
pub mod scripted;

pub use errors::{PlanServiceError, PlanServiceErrorCode};
pub use http::HttpPlanProvider;
pub use scripted::ScriptedPlanProvider;

/// Request for generating a new workout program for a gym
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Gym whose equipment and exercise pool constrain the program
    pub gym_id: Uuid,
    /// Training split to generate
    pub program_type: ProgramType,
    /// Session length the workouts must fit
    pub session_length: SessionLength,
}

/// Request for copying the workout program of one gym to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyPlanRequest {
    /// Gym whose workouts are copied
    pub source_gym_id: Uuid,
    /// Gym receiving the copies
    pub target_gym_id: Uuid,
}

/// Summary of one child workout returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildPlanSummary {
    /// Plan row id, resolvable against the remote store
    pub id: Uuid,
    /// Workout display name
    pub name: String,
}

/// Successful service response; the plan rows themselves land in the
/// remote store and are fetched from there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanServiceResponse {
    /// Root main-program plan id
    pub main_plan_id: Uuid,
    /// Child workouts created or copied
    pub child_plans: Vec<ChildPlanSummary>,
    /// Total plan-exercise rows written
    pub exercise_count: usize,
}

/// Plan-generation service contract
#[async_trait]
pub trait PlanProvider: Send + Sync {
    /// Generate a workout program for a gym
    ///
    /// # Errors
    ///
    /// Returns a [`PlanServiceError`] when the service rejects the request
    /// or is unreachable.
    async fn generate_plan(
        &self,
        request: &GenerationRequest,
    ) -> Result<PlanServiceResponse, PlanServiceError>;

    /// Copy the child workouts of one gym to another
    ///
    /// # Errors
    ///
    /// Returns a [`PlanServiceError`] when the source has nothing to copy,
    /// the service rejects the request, or the service is unreachable.
    async fn copy_plans(
        &self,
        request: &CopyPlanRequest,
    ) -> Result<PlanServiceResponse, PlanServiceError>;

    /// Provider name for logging
    fn provider_name(&self) -> &'static str;
}
