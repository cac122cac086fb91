// ABOUTME: Active-gym pointer resolution when the current target gym goes away
// ABOUTME: Prefers complete gyms, persists the replacement before any deletion proceeds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! Active-gym resolution
//!
//! When a gym is deleted or abandoned the profile's `active_gym_id` must
//! never be left pointing at it. The resolver picks a replacement
//! (preference: any complete gym, else the oldest remaining gym) and
//! persists it *before* the caller proceeds with the deletion, so there is
//! no window where the pointer dangles.

use crate::errors::AppResult;
use crate::models::GymWithStatus;
use crate::services::completeness;
use crate::store::RemoteStore;
use tracing::info;
use uuid::Uuid;

/// Pick and persist a replacement active gym, excluding `excluded_gym_id`
///
/// Returns the new active gym id, or `None` when no other gym exists (the
/// caller must then refuse the deletion that triggered the resolution,
/// forced-cancellation cleanup aside). Nothing is persisted on `None`.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the profile update
/// fails.
pub async fn resolve_replacement(
    store: &dyn RemoteStore,
    owner_id: Uuid,
    excluded_gym_id: Uuid,
) -> AppResult<Option<Uuid>> {
    let gyms = store.list_gyms(owner_id).await?;

    let mut survivors = Vec::new();
    for gym in gyms {
        if gym.id == excluded_gym_id {
            continue;
        }
        let is_complete = completeness::is_complete(store, gym.id).await;
        survivors.push(GymWithStatus { gym, is_complete });
    }

    resolve_among_survivors(store, owner_id, &survivors).await
}

/// Pick and persist a replacement among an already-filtered survivor set
///
/// The reaper uses this variant so the replacement can never be a gym
/// scheduled for deletion in the same pass. `survivors` must be ordered by
/// creation time ascending.
///
/// # Errors
///
/// Returns an error if persisting the new pointer fails.
pub async fn resolve_among_survivors(
    store: &dyn RemoteStore,
    owner_id: Uuid,
    survivors: &[GymWithStatus],
) -> AppResult<Option<Uuid>> {
    let replacement = survivors
        .iter()
        .find(|entry| entry.is_complete)
        .or_else(|| survivors.first());

    let Some(entry) = replacement else {
        return Ok(None);
    };

    store.set_active_gym(owner_id, Some(entry.gym.id)).await?;
    info!(
        "Active gym for user {owner_id} reassigned to {} ({})",
        entry.gym.id, entry.gym.name
    );

    Ok(Some(entry.gym.id))
}
