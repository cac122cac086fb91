// ABOUTME: Coordinates plan-service calls during gym setup and classifies their results
// ABOUTME: Service failures become deferred outcomes so a slow generator never dooms a finished gym
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{PlanFilter, PlanNode, PlanTree};
use crate::providers::{CopyPlanRequest, GenerationRequest, PlanProvider, PlanServiceError};
use crate::store::RemoteStore;

/// What a plan-generation or plan-copy attempt produced.
///
/// Only `Generated` carries plans. Every other variant leaves the gym in
/// place without workout plans; the caller decides whether that finishes
/// the wizard (plans can always be generated later from the dashboard).
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The service produced a program and the full tree was loaded back.
    Generated(PlanTree),
    /// Copy was requested but the source gym has no workouts to copy.
    NothingToCopy,
    /// The user's profile is missing fields generation requires; the
    /// payload names them.
    PrerequisiteMissing(Vec<&'static str>),
    /// The service timed out or failed; the payload says why. The gym is
    /// kept and generation can be retried later.
    Deferred(String),
}

impl GenerationOutcome {
    /// True when plans were produced and loaded.
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }

    /// Stable label for logs and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Generated(_) => "generated",
            Self::NothingToCopy => "nothing_to_copy",
            Self::PrerequisiteMissing(_) => "prerequisite_missing",
            Self::Deferred(_) => "deferred",
        }
    }
}

/// Asks the plan service to generate a fresh program for `gym_id`.
///
/// Business rules:
/// - The owner's profile must already hold a program type and session
///   length; otherwise the call is skipped and the missing field names are
///   returned, so the wizard can route the user back to profile collection.
/// - The provider call is bounded by `timeout`. A timeout or any service
///   error defers generation instead of failing the setup.
///
/// # Errors
///
/// Returns an error only when the remote store fails while reading the
/// profile; plan-service problems are folded into the outcome.
pub async fn generate(
    store: &dyn RemoteStore,
    provider: &dyn PlanProvider,
    timeout: Duration,
    owner_id: Uuid,
    gym_id: Uuid,
) -> AppResult<GenerationOutcome> {
    let profile = store.get_profile(owner_id).await?;
    let Some(profile) = profile else {
        return Ok(GenerationOutcome::PrerequisiteMissing(vec![
            "program_type",
            "preferred_session_length",
        ]));
    };
    let (Some(program_type), Some(session_length)) =
        (profile.program_type, profile.preferred_session_length)
    else {
        return Ok(GenerationOutcome::PrerequisiteMissing(
            profile.missing_generation_fields(),
        ));
    };

    let request = GenerationRequest {
        gym_id,
        program_type,
        session_length,
    };
    info!(
        user_id = %owner_id,
        gym_id = %gym_id,
        provider = provider.provider_name(),
        program_type = %program_type,
        "Requesting plan generation"
    );

    match tokio::time::timeout(timeout, provider.generate_plan(&request)).await {
        Err(_elapsed) => Ok(defer_on_timeout(gym_id, timeout)),
        Ok(Err(err)) => {
            warn!(gym_id = %gym_id, error = %err, "Plan generation failed, deferring");
            Ok(GenerationOutcome::Deferred(err.to_string()))
        }
        Ok(Ok(response)) => load_generated_tree(store, gym_id, response.main_plan_id).await,
    }
}

/// Asks the plan service to copy `source_gym_id`'s workouts onto
/// `target_gym_id`.
///
/// An empty source is a recognized non-failure: the service reports it with
/// a dedicated code and the outcome is `NothingToCopy` rather than a
/// deferral, so the wizard can tell the user exactly what happened.
///
/// # Errors
///
/// Returns an error only when the remote store fails while loading the
/// copied tree; plan-service problems are folded into the outcome.
pub async fn copy_plans(
    store: &dyn RemoteStore,
    provider: &dyn PlanProvider,
    timeout: Duration,
    owner_id: Uuid,
    source_gym_id: Uuid,
    target_gym_id: Uuid,
) -> AppResult<GenerationOutcome> {
    let request = CopyPlanRequest {
        source_gym_id,
        target_gym_id,
    };
    info!(
        user_id = %owner_id,
        source_gym_id = %source_gym_id,
        target_gym_id = %target_gym_id,
        provider = provider.provider_name(),
        "Requesting plan copy"
    );

    match tokio::time::timeout(timeout, provider.copy_plans(&request)).await {
        Err(_elapsed) => Ok(defer_on_timeout(target_gym_id, timeout)),
        Ok(Err(err)) => Ok(classify_copy_error(source_gym_id, &err)),
        Ok(Ok(response)) => load_generated_tree(store, target_gym_id, response.main_plan_id).await,
    }
}

/// Loads the plan tree the service reported, falling back to a deferral
/// when the readback fails. The plans exist remotely at this point, so a
/// readback failure must not trigger gym cleanup.
async fn load_generated_tree(
    store: &dyn RemoteStore,
    gym_id: Uuid,
    main_plan_id: Uuid,
) -> AppResult<GenerationOutcome> {
    match fetch_plan_tree(store, main_plan_id).await {
        Ok(tree) => {
            info!(
                gym_id = %gym_id,
                plans = tree.plan_count(),
                exercises = tree.exercise_count(),
                "Plan tree ready"
            );
            Ok(GenerationOutcome::Generated(tree))
        }
        Err(err) => {
            warn!(
                gym_id = %gym_id,
                main_plan_id = %main_plan_id,
                error = %err,
                "Plans were created but could not be loaded, deferring"
            );
            Ok(GenerationOutcome::Deferred(format!(
                "plans were created but could not be loaded: {err}"
            )))
        }
    }
}

fn defer_on_timeout(gym_id: Uuid, timeout: Duration) -> GenerationOutcome {
    warn!(
        gym_id = %gym_id,
        timeout_secs = timeout.as_secs(),
        "Plan service did not respond in time, deferring"
    );
    GenerationOutcome::Deferred(format!(
        "plan service did not respond within {}s",
        timeout.as_secs()
    ))
}

fn classify_copy_error(source_gym_id: Uuid, err: &PlanServiceError) -> GenerationOutcome {
    if err.is_nothing_to_copy() {
        info!(source_gym_id = %source_gym_id, "Source gym has no workouts to copy");
        return GenerationOutcome::NothingToCopy;
    }
    warn!(source_gym_id = %source_gym_id, error = %err, "Plan copy failed, deferring");
    GenerationOutcome::Deferred(err.to_string())
}

/// Fetches a main program and its child workouts as one tree.
///
/// # Errors
///
/// Returns `ResourceNotFound` when `main_plan_id` does not exist, or a
/// database error when any of the reads fail.
pub async fn fetch_plan_tree(store: &dyn RemoteStore, main_plan_id: Uuid) -> AppResult<PlanTree> {
    let main_plan = store
        .get_workout_plan(main_plan_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("workout plan {main_plan_id}")))?;
    let main_exercises = store.list_plan_exercises(main_plan_id).await?;

    let child_plans = store
        .list_workout_plans(&PlanFilter::children_of(main_plan_id))
        .await?;
    let mut children = Vec::with_capacity(child_plans.len());
    for plan in child_plans {
        let exercises = store.list_plan_exercises(plan.id).await?;
        children.push(PlanNode { plan, exercises });
    }

    Ok(PlanTree {
        main: PlanNode {
            plan: main_plan,
            exercises: main_exercises,
        },
        children,
    })
}
