// ABOUTME: Gym completeness checks derived from equipment, pool, and plan presence
// ABOUTME: Fails open on read errors so transient failures never look like empty gyms
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! Gym completeness
//!
//! A gym is complete once it has any equipment row, any exercise-pool
//! entry, or any workout plan. The three existence checks run
//! concurrently; an individual check error is logged and treated as
//! "present", so a transient read failure can never make a configured gym
//! look reapable.

use crate::store::RemoteStore;
use tracing::warn;
use uuid::Uuid;

/// Whether the gym has no equipment, no pool entries, and no plans
///
/// Infallible by design: errors count as "present".
pub async fn is_incomplete(store: &dyn RemoteStore, gym_id: Uuid) -> bool {
    let (equipment, pool, plans) = tokio::join!(
        store.has_equipment(gym_id),
        store.has_exercise_pool_entries(gym_id),
        store.has_workout_plans(gym_id),
    );

    let any_present = present_or_fail_safe(gym_id, "equipment", equipment)
        || present_or_fail_safe(gym_id, "exercise pool", pool)
        || present_or_fail_safe(gym_id, "workout plans", plans);

    !any_present
}

/// Inverse of [`is_incomplete`]
pub async fn is_complete(store: &dyn RemoteStore, gym_id: Uuid) -> bool {
    !is_incomplete(store, gym_id).await
}

fn present_or_fail_safe(gym_id: Uuid, what: &str, result: anyhow::Result<bool>) -> bool {
    match result {
        Ok(present) => present,
        Err(error) => {
            warn!("Completeness check of {what} for gym {gym_id} failed, treating as present: {error}");
            true
        }
    }
}
