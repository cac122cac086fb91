// ABOUTME: Incomplete-gym cleanup passes that keep abandoned setup wizards from accumulating
// ABOUTME: Background pass sweeps stale drafts conservatively; forced pass removes one known gym
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::limits::{MIN_REMAINING_GYMS, MIN_REMAINING_GYMS_DURING_SETUP};
use crate::errors::AppResult;
use crate::models::GymWithStatus;
use crate::services::{active_gym, completeness};
use crate::store::RemoteStore;

/// Controls which gyms a reap pass may touch.
///
/// The background pass sweeps every incomplete gym a user owns, optionally
/// sparing one gym that is mid-setup right now. The forced pass targets a
/// single gym whose wizard just failed or was cancelled, and is allowed to
/// delete it even when it is the user's only gym.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReapScope {
    /// When set, delete exactly this gym (if it is still incomplete) and
    /// skip the general sweep.
    pub force_gym_id: Option<Uuid>,
    /// Never delete this gym, even if incomplete. Used for the gym whose
    /// setup wizard is currently in progress.
    pub protected_gym_id: Option<Uuid>,
}

impl ReapScope {
    /// General sweep with no exemptions.
    #[must_use]
    pub const fn background() -> Self {
        Self {
            force_gym_id: None,
            protected_gym_id: None,
        }
    }

    /// General sweep that spares the gym currently being set up.
    #[must_use]
    pub const fn background_protecting(gym_id: Uuid) -> Self {
        Self {
            force_gym_id: None,
            protected_gym_id: Some(gym_id),
        }
    }

    /// Targeted removal of one gym after its setup failed or was abandoned.
    #[must_use]
    pub const fn forced(gym_id: Uuid) -> Self {
        Self {
            force_gym_id: Some(gym_id),
            protected_gym_id: None,
        }
    }
}

/// Deletes incomplete gyms for `owner_id` according to `scope` and returns
/// how many gyms were removed.
///
/// Business rules:
/// - A gym missing equipment, an exercise pool, or workout plans counts as
///   incomplete; anything else survives every pass.
/// - The background pass never deletes a user's only gym and never leaves a
///   user with fewer gyms than the floor (two when a setup is in progress,
///   one otherwise). When honoring the floor would require picking which
///   incomplete gyms to keep, the pass deletes none of them rather than
///   choose arbitrarily.
/// - If every gym is incomplete, the oldest one survives as the anchor for
///   the next setup attempt.
/// - The forced pass deletes exactly the named gym, and is the one path
///   allowed to leave the user with zero gyms.
/// - Whenever the active gym is about to be deleted, the active pointer is
///   reassigned to a surviving gym (or cleared) before any row is removed,
///   so a crash mid-pass never leaves it dangling.
///
/// # Errors
///
/// Returns an error when the remote store fails; no deletions happen after
/// a failed read, and a failed delete stops the pass early.
pub async fn reap(store: &dyn RemoteStore, owner_id: Uuid, scope: &ReapScope) -> AppResult<usize> {
    if let Some(gym_id) = scope.force_gym_id {
        return forced_pass(store, owner_id, gym_id).await;
    }
    background_pass(store, owner_id, scope.protected_gym_id).await
}

/// Sweeps all reapable incomplete gyms owned by `owner_id`.
async fn background_pass(
    store: &dyn RemoteStore,
    owner_id: Uuid,
    protected_gym_id: Option<Uuid>,
) -> AppResult<usize> {
    let gyms = store.list_gyms(owner_id).await?;
    let total = gyms.len();

    let mut classified: Vec<GymWithStatus> = Vec::with_capacity(total);
    for gym in gyms {
        let is_complete = completeness::is_complete(store, gym.id).await;
        classified.push(GymWithStatus { gym, is_complete });
    }

    let incomplete_count = classified
        .iter()
        .filter(|entry| !entry.is_complete)
        .count();
    if incomplete_count == 0 {
        debug!(user_id = %owner_id, "Reap pass found no incomplete gyms");
        return Ok(0);
    }

    // A lone gym is never swept, complete or not. The user keeps their
    // draft until they finish it or abandon it explicitly.
    if total == 1 {
        debug!(user_id = %owner_id, "Reap pass preserved the user's only gym");
        return Ok(0);
    }

    let doomed = select_doomed(&classified, incomplete_count, protected_gym_id);
    if doomed.is_empty() {
        return Ok(0);
    }

    reassign_active_if_doomed(store, owner_id, &classified, &doomed).await?;

    let mut deleted = 0;
    for gym_id in &doomed {
        store.delete_gym(*gym_id).await?;
        deleted += 1;
        info!(user_id = %owner_id, gym_id = %gym_id, "Reaped incomplete gym");
    }
    Ok(deleted)
}

/// Picks which incomplete gyms the background pass will delete.
fn select_doomed(
    classified: &[GymWithStatus],
    incomplete_count: usize,
    protected_gym_id: Option<Uuid>,
) -> Vec<Uuid> {
    let total = classified.len();

    if incomplete_count == total {
        // Everything is a draft. Keep the oldest as the anchor (plus the
        // protected gym, when set) and sweep the rest.
        let Some(oldest) = classified.first() else {
            return Vec::new();
        };
        let oldest_id = oldest.gym.id;
        return classified
            .iter()
            .filter(|entry| entry.gym.id != oldest_id && Some(entry.gym.id) != protected_gym_id)
            .map(|entry| entry.gym.id)
            .collect();
    }

    let candidates: Vec<Uuid> = classified
        .iter()
        .filter(|entry| !entry.is_complete && Some(entry.gym.id) != protected_gym_id)
        .map(|entry| entry.gym.id)
        .collect();

    // All-or-nothing floor check: a partial sweep would have to pick which
    // incomplete gyms survive, so if deleting every candidate dips below
    // the floor, delete none of them.
    let required = if protected_gym_id.is_some() {
        MIN_REMAINING_GYMS_DURING_SETUP
    } else {
        MIN_REMAINING_GYMS
    };
    if total - candidates.len() < required {
        info!(
            total,
            candidates = candidates.len(),
            required,
            "Reap pass skipped: sweeping would leave too few gyms"
        );
        return Vec::new();
    }
    candidates
}

/// Moves the active-gym pointer off any gym in `doomed` before deletion.
async fn reassign_active_if_doomed(
    store: &dyn RemoteStore,
    owner_id: Uuid,
    classified: &[GymWithStatus],
    doomed: &[Uuid],
) -> AppResult<()> {
    let Some(profile) = store.get_profile(owner_id).await? else {
        return Ok(());
    };
    let Some(active_gym_id) = profile.active_gym_id else {
        return Ok(());
    };
    if !doomed.contains(&active_gym_id) {
        return Ok(());
    }

    let survivors: Vec<GymWithStatus> = classified
        .iter()
        .filter(|entry| !doomed.contains(&entry.gym.id))
        .cloned()
        .collect();
    active_gym::resolve_among_survivors(store, owner_id, &survivors).await?;
    Ok(())
}

/// Deletes exactly `gym_id` if it exists and is still incomplete.
///
/// This pass runs when a setup wizard fails or is cancelled and the draft
/// gym should not linger. Unlike the background sweep it may delete the
/// user's only gym: an abandoned first setup leaves zero gyms, matching
/// the state before the wizard started.
async fn forced_pass(store: &dyn RemoteStore, owner_id: Uuid, gym_id: Uuid) -> AppResult<usize> {
    let Some(gym) = store.get_gym(gym_id).await? else {
        debug!(user_id = %owner_id, gym_id = %gym_id, "Forced reap target already gone");
        return Ok(0);
    };
    if gym.owner_id != owner_id {
        debug!(user_id = %owner_id, gym_id = %gym_id, "Forced reap target owned by someone else");
        return Ok(0);
    }
    if completeness::is_complete(store, gym_id).await {
        debug!(user_id = %owner_id, gym_id = %gym_id, "Forced reap target is complete, keeping it");
        return Ok(0);
    }

    let profile = store.get_profile(owner_id).await?;
    let active_is_target = profile.and_then(|p| p.active_gym_id) == Some(gym_id);
    if active_is_target {
        let gyms = store.list_gyms(owner_id).await?;
        let mut survivors: Vec<GymWithStatus> = Vec::with_capacity(gyms.len().saturating_sub(1));
        for gym in gyms {
            if gym.id == gym_id {
                continue;
            }
            let is_complete = completeness::is_complete(store, gym.id).await;
            survivors.push(GymWithStatus { gym, is_complete });
        }
        if survivors.is_empty() {
            store.set_active_gym(owner_id, None).await?;
            info!(user_id = %owner_id, "Cleared active gym: forced reap removed the only gym");
        } else {
            active_gym::resolve_among_survivors(store, owner_id, &survivors).await?;
        }
    }

    store.delete_gym(gym_id).await?;
    info!(user_id = %owner_id, gym_id = %gym_id, "Force-reaped abandoned gym");
    Ok(1)
}
