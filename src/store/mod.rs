// ABOUTME: Remote store abstraction for the authoritative gym and plan data
// ABOUTME: Trait contract plus the SQLite implementation used in production and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! # Remote Store Abstraction
//!
//! The authoritative backend for gyms, equipment, exercise pools, workout
//! plans, and user profiles. All orchestrator components talk to the store
//! through the [`RemoteStore`] trait; [`SqliteStore`] is the shipped
//! implementation. Methods return `anyhow::Result` and are converted to
//! [`crate::errors::AppError`] at service boundaries.

use crate::models::{
    Equipment, ExercisePoolEntry, Gym, PlanExercise, PlanFilter, Profile, ProfileUpdate,
    WorkoutPlan,
};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

pub mod sqlite;

pub use sqlite::SqliteStore;

/// Core remote store abstraction
///
/// All store implementations must implement this trait to provide a
/// consistent interface for the orchestrator and services layer.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Run store migrations to set up schema
    async fn migrate(&self) -> Result<()>;

    // ================================
    // Gym Management
    // ================================

    /// Create a new gym profile
    async fn create_gym(&self, gym: &Gym) -> Result<()>;

    /// Get a gym by ID
    async fn get_gym(&self, gym_id: Uuid) -> Result<Option<Gym>>;

    /// List all gyms for an owner, ordered by creation time ascending
    async fn list_gyms(&self, owner_id: Uuid) -> Result<Vec<Gym>>;

    /// Count gyms owned by a user
    async fn count_gyms(&self, owner_id: Uuid) -> Result<i64>;

    /// Rename a gym (the only mutable gym field)
    async fn rename_gym(&self, gym_id: Uuid, name: &str) -> Result<()>;

    /// Delete a gym and all dependent rows in cascade order:
    /// equipment, pool entries, plans with their exercises, then the gym row
    async fn delete_gym(&self, gym_id: Uuid) -> Result<()>;

    // ================================
    // Equipment
    // ================================

    /// Insert a batch of equipment rows
    async fn insert_equipment(&self, items: &[Equipment]) -> Result<()>;

    /// List equipment configured for a gym
    async fn list_equipment(&self, gym_id: Uuid) -> Result<Vec<Equipment>>;

    /// Whether a gym has at least one equipment row
    async fn has_equipment(&self, gym_id: Uuid) -> Result<bool>;

    // ================================
    // Exercise Pool
    // ================================

    /// Insert a batch of exercise pool entries
    async fn insert_exercise_pool_entries(&self, entries: &[ExercisePoolEntry]) -> Result<()>;

    /// List the exercise pool selected for a gym
    async fn list_exercise_pool(&self, gym_id: Uuid) -> Result<Vec<ExercisePoolEntry>>;

    /// Whether a gym has at least one exercise pool entry
    async fn has_exercise_pool_entries(&self, gym_id: Uuid) -> Result<bool>;

    // ================================
    // User Profiles
    // ================================

    /// Get a user profile
    async fn get_profile(&self, owner_id: Uuid) -> Result<Option<Profile>>;

    /// Create or replace a user profile
    async fn upsert_profile(&self, profile: &Profile) -> Result<()>;

    /// Update only the generation-prerequisite fields that are `Some`
    async fn update_profile_fields(&self, owner_id: Uuid, fields: &ProfileUpdate) -> Result<()>;

    /// Point the profile's active gym at `gym_id` (or clear it)
    async fn set_active_gym(&self, owner_id: Uuid, gym_id: Option<Uuid>) -> Result<()>;

    // ================================
    // Workout Plans
    // ================================

    /// Insert a workout plan row
    async fn insert_workout_plan(&self, plan: &WorkoutPlan) -> Result<()>;

    /// Get a workout plan by ID
    async fn get_workout_plan(&self, plan_id: Uuid) -> Result<Option<WorkoutPlan>>;

    /// List workout plans matching a filter
    async fn list_workout_plans(&self, filter: &PlanFilter) -> Result<Vec<WorkoutPlan>>;

    /// Whether any workout plan references a gym
    async fn has_workout_plans(&self, gym_id: Uuid) -> Result<bool>;

    /// Insert a batch of plan exercises
    async fn insert_plan_exercises(&self, exercises: &[PlanExercise]) -> Result<()>;

    /// List the exercises of a plan, ordered by `order_index`
    async fn list_plan_exercises(&self, plan_id: Uuid) -> Result<Vec<PlanExercise>>;
}
