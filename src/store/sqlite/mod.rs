// ABOUTME: SQLite implementation of the remote store contract
// ABOUTME: Connection pool management, migrations, and trait delegation to domain modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! SQLite store implementation
//!
//! Wraps an `sqlx` connection pool and implements [`RemoteStore`]. The
//! actual queries live in per-domain modules (`gyms`, `plans`, `profiles`)
//! as inherent `impl` blocks; this module owns the pool, the migration
//! entry point, and the trait delegation.

mod gyms;
mod plans;
mod profiles;

use super::RemoteStore;
use crate::models::{
    Equipment, ExercisePoolEntry, Gym, PlanExercise, PlanFilter, Profile, ProfileUpdate,
    WorkoutPlan,
};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Pool, Sqlite, SqlitePool};
use tracing::info;
use uuid::Uuid;

/// SQLite-backed remote store
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new store connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be established.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options).await?;

        Ok(Self { pool })
    }

    /// Get a reference to the pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl RemoteStore for SqliteStore {
    async fn migrate(&self) -> Result<()> {
        self.migrate_gyms().await?;
        self.migrate_plans().await?;
        self.migrate_profiles().await?;

        info!("SQLite store migrations complete");
        Ok(())
    }

    async fn create_gym(&self, gym: &Gym) -> Result<()> {
        self.insert_gym_row(gym).await
    }

    async fn get_gym(&self, gym_id: Uuid) -> Result<Option<Gym>> {
        self.fetch_gym(gym_id).await
    }

    async fn list_gyms(&self, owner_id: Uuid) -> Result<Vec<Gym>> {
        self.fetch_gyms_for_owner(owner_id).await
    }

    async fn count_gyms(&self, owner_id: Uuid) -> Result<i64> {
        self.count_gyms_for_owner(owner_id).await
    }

    async fn rename_gym(&self, gym_id: Uuid, name: &str) -> Result<()> {
        self.update_gym_name(gym_id, name).await
    }

    async fn delete_gym(&self, gym_id: Uuid) -> Result<()> {
        self.delete_gym_cascade(gym_id).await
    }

    async fn insert_equipment(&self, items: &[Equipment]) -> Result<()> {
        self.insert_equipment_rows(items).await
    }

    async fn list_equipment(&self, gym_id: Uuid) -> Result<Vec<Equipment>> {
        self.fetch_equipment(gym_id).await
    }

    async fn has_equipment(&self, gym_id: Uuid) -> Result<bool> {
        self.any_equipment(gym_id).await
    }

    async fn insert_exercise_pool_entries(&self, entries: &[ExercisePoolEntry]) -> Result<()> {
        self.insert_pool_rows(entries).await
    }

    async fn list_exercise_pool(&self, gym_id: Uuid) -> Result<Vec<ExercisePoolEntry>> {
        self.fetch_exercise_pool(gym_id).await
    }

    async fn has_exercise_pool_entries(&self, gym_id: Uuid) -> Result<bool> {
        self.any_pool_entries(gym_id).await
    }

    async fn get_profile(&self, owner_id: Uuid) -> Result<Option<Profile>> {
        self.fetch_profile(owner_id).await
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<()> {
        self.upsert_profile_row(profile).await
    }

    async fn update_profile_fields(&self, owner_id: Uuid, fields: &ProfileUpdate) -> Result<()> {
        self.update_profile_generation_fields(owner_id, fields).await
    }

    async fn set_active_gym(&self, owner_id: Uuid, gym_id: Option<Uuid>) -> Result<()> {
        self.update_active_gym(owner_id, gym_id).await
    }

    async fn insert_workout_plan(&self, plan: &WorkoutPlan) -> Result<()> {
        self.insert_plan_row(plan).await
    }

    async fn get_workout_plan(&self, plan_id: Uuid) -> Result<Option<WorkoutPlan>> {
        self.fetch_plan(plan_id).await
    }

    async fn list_workout_plans(&self, filter: &PlanFilter) -> Result<Vec<WorkoutPlan>> {
        self.fetch_plans(filter).await
    }

    async fn has_workout_plans(&self, gym_id: Uuid) -> Result<bool> {
        self.any_plans_for_gym(gym_id).await
    }

    async fn insert_plan_exercises(&self, exercises: &[PlanExercise]) -> Result<()> {
        self.insert_plan_exercise_rows(exercises).await
    }

    async fn list_plan_exercises(&self, plan_id: Uuid) -> Result<Vec<PlanExercise>> {
        self.fetch_plan_exercises(plan_id).await
    }
}
