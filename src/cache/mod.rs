// ABOUTME: Local cache abstraction for the on-device workout plan mirror
// ABOUTME: Pluggable backend support following the RemoteStore trait pattern
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! # Local Plan Mirror Cache
//!
//! The on-device replica of the owner's workout plans. The mirror
//! synchronizer writes generated plan trees here through idempotent
//! upserts; [`replace_owner_snapshot`](LocalCache::replace_owner_snapshot)
//! is the corrective full-resync landing operation used when individual
//! upserts fail.

use crate::errors::AppResult;
use crate::models::{PlanExercise, WorkoutPlan};
use async_trait::async_trait;
use uuid::Uuid;

pub mod memory;

pub use memory::MemoryCache;

/// Cache provider trait for pluggable mirror backends
#[async_trait]
pub trait LocalCache: Send + Sync {
    /// Insert or replace a plan, keyed by plan id
    async fn upsert_plan(&self, plan: &WorkoutPlan) -> AppResult<()>;

    /// Insert a plan exercise; an entry with the same
    /// `(plan_id, exercise_id, order_index)` key is a no-op
    async fn upsert_plan_exercise(&self, exercise: &PlanExercise) -> AppResult<()>;

    /// Remove one plan exercise by its `(plan_id, exercise_id, order_index)`
    /// key; removing an absent entry is a no-op. Used to roll back an
    /// optimistic cache write whose remote counterpart failed.
    async fn remove_plan_exercise(
        &self,
        plan_id: Uuid,
        exercise_id: Uuid,
        order_index: u32,
    ) -> AppResult<()>;

    /// Get a mirrored plan by id
    async fn get_plan(&self, plan_id: Uuid) -> AppResult<Option<WorkoutPlan>>;

    /// List all mirrored plans for an owner, ordered by creation time
    async fn list_plans(&self, owner_id: Uuid) -> AppResult<Vec<WorkoutPlan>>;

    /// List the mirrored exercises of a plan, ordered by position
    async fn list_plan_exercises(&self, plan_id: Uuid) -> AppResult<Vec<PlanExercise>>;

    /// Drop everything mirrored for `owner_id` and install the given
    /// snapshot in its place
    async fn replace_owner_snapshot(
        &self,
        owner_id: Uuid,
        plans: Vec<WorkoutPlan>,
        exercises: Vec<PlanExercise>,
    ) -> AppResult<()>;

    /// Drop all mirrored data
    async fn clear(&self) -> AppResult<()>;
}
