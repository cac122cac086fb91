// ABOUTME: Profile access for the setup wizard's program-preference collection step
// ABOUTME: Lazily creates the one-per-user profile row and applies partial field updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{Profile, ProfileUpdate};
use crate::store::RemoteStore;

/// Fetches the user's profile, creating an empty one on first access.
/// Every user has exactly one profile row once any flow has touched it.
///
/// # Errors
///
/// Returns a database error when the read or the first-access insert fails.
pub async fn get_or_create(store: &dyn RemoteStore, owner_id: Uuid) -> AppResult<Profile> {
    if let Some(profile) = store.get_profile(owner_id).await? {
        return Ok(profile);
    }

    let profile = Profile::new(owner_id);
    store.upsert_profile(&profile).await?;
    debug!(user_id = %owner_id, "Created empty profile on first access");
    Ok(profile)
}

/// Applies a partial update to the generation-prerequisite fields and
/// returns the merged profile. Fields left `None` in `update` keep their
/// stored values, so the wizard can collect one answer at a time.
///
/// # Errors
///
/// Returns a database error when the profile read or the update fails.
pub async fn update_fields(
    store: &dyn RemoteStore,
    owner_id: Uuid,
    update: &ProfileUpdate,
) -> AppResult<Profile> {
    let mut profile = get_or_create(store, owner_id).await?;
    store.update_profile_fields(owner_id, update).await?;

    if let Some(program_type) = update.program_type {
        profile.program_type = Some(program_type);
    }
    if let Some(session_length) = update.preferred_session_length {
        profile.preferred_session_length = Some(session_length);
    }
    info!(
        user_id = %owner_id,
        complete = profile.has_generation_prerequisites(),
        "Updated profile preferences"
    );
    Ok(profile)
}
