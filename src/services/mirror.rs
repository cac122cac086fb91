// ABOUTME: Keeps the on-device plan mirror in step with the remote store
// ABOUTME: Per-item idempotent upserts with a corrective full resync when any item fails
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::cache::LocalCache;
use crate::errors::{AppError, AppResult};
use crate::models::{PlanExercise, PlanFilter, PlanTree};
use crate::store::RemoteStore;

/// What a mirror pass accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorReport {
    /// Plans written to the local mirror
    pub plans_mirrored: usize,
    /// Plan exercises written to the local mirror
    pub exercises_mirrored: usize,
    /// Items that failed to mirror before the corrective resync
    pub failed_items: usize,
    /// True when per-item failures forced a full snapshot resync
    pub corrective_resync: bool,
}

impl MirrorReport {
    /// True when every item mirrored on the first attempt.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed_items == 0
    }
}

/// Mirrors a freshly generated plan tree into the local cache.
///
/// Business rules:
/// - Every write is an idempotent upsert, so mirroring the same tree twice
///   leaves the cache unchanged.
/// - A failed item never aborts the pass; it is logged and counted, and the
///   remaining items still get their chance.
/// - Any failure at all triggers a corrective full resync from the remote
///   store, which is the authoritative copy. The pass only errors when that
///   resync fails too, leaving the mirror genuinely stale.
///
/// # Errors
///
/// Returns `SyncFailed` when items failed and the corrective resync could
/// not repair the mirror.
pub async fn mirror(
    store: &dyn RemoteStore,
    cache: &dyn LocalCache,
    owner_id: Uuid,
    tree: &PlanTree,
) -> AppResult<MirrorReport> {
    let mut report = MirrorReport {
        plans_mirrored: 0,
        exercises_mirrored: 0,
        failed_items: 0,
        corrective_resync: false,
    };

    for node in tree.nodes() {
        match cache.upsert_plan(&node.plan).await {
            Ok(()) => report.plans_mirrored += 1,
            Err(err) => {
                warn!(plan_id = %node.plan.id, error = %err, "Failed to mirror plan");
                report.failed_items += 1;
            }
        }
        for exercise in &node.exercises {
            match cache.upsert_plan_exercise(exercise).await {
                Ok(()) => report.exercises_mirrored += 1,
                Err(err) => {
                    warn!(
                        plan_id = %exercise.plan_id,
                        exercise_id = %exercise.exercise_id,
                        error = %err,
                        "Failed to mirror plan exercise"
                    );
                    report.failed_items += 1;
                }
            }
        }
    }

    if report.failed_items > 0 {
        warn!(
            user_id = %owner_id,
            failed = report.failed_items,
            "Mirror pass had failures, running corrective resync"
        );
        match full_resync(store, cache, owner_id).await {
            Ok((plans, exercises)) => {
                report.corrective_resync = true;
                info!(
                    user_id = %owner_id,
                    plans,
                    exercises,
                    "Corrective resync repaired the mirror"
                );
            }
            Err(err) => {
                return Err(AppError::sync_failed(format!(
                    "{} items failed to mirror and the corrective resync also failed: {err}",
                    report.failed_items
                ))
                .with_user_id(owner_id));
            }
        }
    }

    Ok(report)
}

/// Replaces the owner's entire local mirror with a fresh snapshot pulled
/// from the remote store. Returns `(plans, exercises)` counts.
///
/// # Errors
///
/// Returns an error when the remote reads or the snapshot installation
/// fail; the previous mirror contents are kept in that case.
pub async fn full_resync(
    store: &dyn RemoteStore,
    cache: &dyn LocalCache,
    owner_id: Uuid,
) -> AppResult<(usize, usize)> {
    let plans = store
        .list_workout_plans(&PlanFilter::for_owner(owner_id))
        .await?;
    let mut exercises = Vec::new();
    for plan in &plans {
        exercises.extend(store.list_plan_exercises(plan.id).await?);
    }

    let counts = (plans.len(), exercises.len());
    cache
        .replace_owner_snapshot(owner_id, plans, exercises)
        .await?;
    Ok(counts)
}

/// Links one exercise to a plan, echoing it into the local mirror first.
///
/// The mirror write happens before the remote write so the UI sees the new
/// exercise immediately; if the remote insert then fails, the optimistic
/// mirror entry is removed again so the mirror never shows an exercise the
/// remote store rejected.
///
/// # Errors
///
/// Returns the remote store's error when the insert fails. If the rollback
/// itself fails the error is still the remote one; the next mirror pass or
/// full resync heals the stray entry.
pub async fn link_exercise(
    store: &dyn RemoteStore,
    cache: &dyn LocalCache,
    exercise: &PlanExercise,
) -> AppResult<()> {
    cache.upsert_plan_exercise(exercise).await?;

    if let Err(err) = store
        .insert_plan_exercises(std::slice::from_ref(exercise))
        .await
    {
        warn!(
            plan_id = %exercise.plan_id,
            exercise_id = %exercise.exercise_id,
            error = %err,
            "Remote exercise link failed, rolling back mirror entry"
        );
        if let Err(rollback_err) = cache
            .remove_plan_exercise(exercise.plan_id, exercise.exercise_id, exercise.order_index)
            .await
        {
            error!(
                plan_id = %exercise.plan_id,
                exercise_id = %exercise.exercise_id,
                error = %rollback_err,
                "Mirror rollback failed; entry will be healed by the next resync"
            );
        }
        return Err(AppError::from(err));
    }

    Ok(())
}
