// ABOUTME: Gym lifecycle operations outside the setup wizard
// ABOUTME: Enforces the per-user cap, the one-gym floor, and active-pointer validity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

use tracing::{info, warn};
use uuid::Uuid;

use crate::constants::limits::{MAX_GYMS_PER_USER, MIN_REMAINING_GYMS};
use crate::errors::{AppError, AppResult};
use crate::models::{Equipment, ExercisePoolEntry, Gym, GymWithStatus};
use crate::services::{active_gym, completeness};
use crate::store::RemoteStore;

/// What a best-effort setup copy actually transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopySetupReport {
    /// Equipment rows copied to the target gym
    pub equipment_copied: usize,
    /// Exercise-pool entries copied to the target gym
    pub pool_copied: usize,
    /// False when any category failed to transfer
    pub complete: bool,
}

/// Creates a gym for `owner_id` with the given display name.
///
/// Business rules:
/// - The name is trimmed and must be non-empty; duplicates are allowed.
/// - A user owns at most [`MAX_GYMS_PER_USER`] gyms; the cap counts every
///   gym, complete or not, so abandoned drafts occupy slots until reaped.
///
/// # Errors
///
/// Returns `InvalidInput` for a blank name, `GymCapReached` at the cap, or
/// a database error when the store fails.
pub async fn create_gym(store: &dyn RemoteStore, owner_id: Uuid, name: &str) -> AppResult<Gym> {
    let name = validated_name(name)?;

    let existing = store.count_gyms(owner_id).await?;
    if usize::try_from(existing).unwrap_or(usize::MAX) >= MAX_GYMS_PER_USER {
        return Err(AppError::gym_cap_reached(MAX_GYMS_PER_USER).with_user_id(owner_id));
    }

    let gym = Gym::new(owner_id, name);
    store.create_gym(&gym).await?;
    info!(user_id = %owner_id, gym_id = %gym.id, "Created gym");
    Ok(gym)
}

/// Renames a gym. The name is the only gym field a user can change after
/// creation.
///
/// # Errors
///
/// Returns `InvalidInput` for a blank name, `ResourceNotFound` when the
/// gym does not exist, or `NotOwner` when `owner_id` does not own it.
pub async fn rename_gym(
    store: &dyn RemoteStore,
    owner_id: Uuid,
    gym_id: Uuid,
    new_name: &str,
) -> AppResult<Gym> {
    let name = validated_name(new_name)?;
    let mut gym = owned_gym(store, owner_id, gym_id).await?;

    store.rename_gym(gym_id, &name).await?;
    info!(user_id = %owner_id, gym_id = %gym_id, "Renamed gym");

    gym.name = name;
    Ok(gym)
}

/// Deletes a gym and everything attached to it.
///
/// Business rules:
/// - Explicit deletion never removes the last gym; the user always keeps at
///   least [`MIN_REMAINING_GYMS`]. (Abandoning a first-ever setup is the
///   one path that can leave zero gyms, and it does not come through here.)
/// - When the deleted gym is the active one, the active pointer moves to a
///   surviving gym before any row is removed.
///
/// # Errors
///
/// Returns `GymFloorViolation` when this is the user's only gym,
/// `ResourceNotFound`/`NotOwner` for scoping failures, or a database error.
pub async fn delete_gym(store: &dyn RemoteStore, owner_id: Uuid, gym_id: Uuid) -> AppResult<()> {
    let gym = owned_gym(store, owner_id, gym_id).await?;

    let total = store.count_gyms(owner_id).await?;
    if usize::try_from(total).unwrap_or(0) <= MIN_REMAINING_GYMS {
        return Err(AppError::gym_floor(gym_id).with_user_id(owner_id));
    }

    let profile = store.get_profile(owner_id).await?;
    if profile.and_then(|p| p.active_gym_id) == Some(gym_id) {
        active_gym::resolve_replacement(store, owner_id, gym_id).await?;
    }

    store.delete_gym(gym_id).await?;
    info!(user_id = %owner_id, gym_id = %gym_id, name = %gym.name, "Deleted gym");
    Ok(())
}

/// Copies the equipment and exercise pool of `source_gym_id` onto
/// `target_gym_id`, best-effort.
///
/// Each category is attempted independently; a failed category is logged
/// and reflected in the report rather than aborting the other one, because
/// a partially equipped gym plus copied plans is still a usable setup.
///
/// # Errors
///
/// Returns `InvalidInput` when source and target are the same gym, or
/// `ResourceNotFound`/`NotOwner` when either gym fails the ownership check.
/// Category-level copy failures do not error; check the report.
pub async fn copy_setup(
    store: &dyn RemoteStore,
    owner_id: Uuid,
    source_gym_id: Uuid,
    target_gym_id: Uuid,
) -> AppResult<CopySetupReport> {
    if source_gym_id == target_gym_id {
        return Err(AppError::invalid_input("cannot copy a gym onto itself").with_gym_id(source_gym_id));
    }
    owned_gym(store, owner_id, source_gym_id).await?;
    owned_gym(store, owner_id, target_gym_id).await?;

    let mut report = CopySetupReport {
        equipment_copied: 0,
        pool_copied: 0,
        complete: true,
    };

    match copy_equipment(store, source_gym_id, target_gym_id).await {
        Ok(copied) => report.equipment_copied = copied,
        Err(err) => {
            warn!(
                source_gym_id = %source_gym_id,
                target_gym_id = %target_gym_id,
                error = %err,
                "Equipment copy failed, continuing without it"
            );
            report.complete = false;
        }
    }

    match copy_exercise_pool(store, source_gym_id, target_gym_id).await {
        Ok(copied) => report.pool_copied = copied,
        Err(err) => {
            warn!(
                source_gym_id = %source_gym_id,
                target_gym_id = %target_gym_id,
                error = %err,
                "Exercise pool copy failed, continuing without it"
            );
            report.complete = false;
        }
    }

    info!(
        user_id = %owner_id,
        source_gym_id = %source_gym_id,
        target_gym_id = %target_gym_id,
        equipment = report.equipment_copied,
        pool = report.pool_copied,
        complete = report.complete,
        "Copied gym setup"
    );
    Ok(report)
}

async fn copy_equipment(
    store: &dyn RemoteStore,
    source_gym_id: Uuid,
    target_gym_id: Uuid,
) -> anyhow::Result<usize> {
    let rows: Vec<Equipment> = store
        .list_equipment(source_gym_id)
        .await?
        .into_iter()
        .map(|row| Equipment {
            gym_id: target_gym_id,
            equipment_type: row.equipment_type,
            quantity: row.quantity,
        })
        .collect();
    if !rows.is_empty() {
        store.insert_equipment(&rows).await?;
    }
    Ok(rows.len())
}

async fn copy_exercise_pool(
    store: &dyn RemoteStore,
    source_gym_id: Uuid,
    target_gym_id: Uuid,
) -> anyhow::Result<usize> {
    let rows: Vec<ExercisePoolEntry> = store
        .list_exercise_pool(source_gym_id)
        .await?
        .into_iter()
        .map(|entry| ExercisePoolEntry {
            gym_id: target_gym_id,
            exercise_id: entry.exercise_id,
        })
        .collect();
    if !rows.is_empty() {
        store.insert_exercise_pool_entries(&rows).await?;
    }
    Ok(rows.len())
}

/// Points the user's active gym at `gym_id` after validating ownership.
///
/// # Errors
///
/// Returns `ResourceNotFound`/`NotOwner` for scoping failures, or a
/// database error when the store fails.
pub async fn set_active_gym(
    store: &dyn RemoteStore,
    owner_id: Uuid,
    gym_id: Uuid,
) -> AppResult<()> {
    owned_gym(store, owner_id, gym_id).await?;
    store.set_active_gym(owner_id, Some(gym_id)).await?;
    info!(user_id = %owner_id, gym_id = %gym_id, "Set active gym");
    Ok(())
}

/// Lists the user's gyms with their derived completeness, oldest first.
/// This feeds the gym-switcher UI, which greys out incomplete gyms.
///
/// # Errors
///
/// Returns a database error when the gym listing fails.
pub async fn list_gyms_with_status(
    store: &dyn RemoteStore,
    owner_id: Uuid,
) -> AppResult<Vec<GymWithStatus>> {
    let gyms = store.list_gyms(owner_id).await?;
    let mut statuses = Vec::with_capacity(gyms.len());
    for gym in gyms {
        let is_complete = completeness::is_complete(store, gym.id).await;
        statuses.push(GymWithStatus { gym, is_complete });
    }
    Ok(statuses)
}

/// Fetches a gym and verifies `owner_id` owns it.
async fn owned_gym(store: &dyn RemoteStore, owner_id: Uuid, gym_id: Uuid) -> AppResult<Gym> {
    let gym = store
        .get_gym(gym_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("gym {gym_id}")).with_user_id(owner_id))?;
    if gym.owner_id != owner_id {
        return Err(AppError::not_owner(gym_id).with_user_id(owner_id));
    }
    Ok(gym)
}

/// Trims and validates a gym display name.
fn validated_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("gym name cannot be empty"));
    }
    Ok(trimmed.to_owned())
}
