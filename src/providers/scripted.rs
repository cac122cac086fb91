// ABOUTME: Deterministic plan provider for development, demos, and tests
// ABOUTME: Seeds real plan rows into the remote store the way the production service does
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! # Scripted Plan Provider
//!
//! A deterministic stand-in for the plan-generation service. Unlike the
//! HTTP provider it needs no running service: it writes the plan rows
//! directly into the remote store, exactly where the production service
//! would put them, and returns the same response shape.
//!
//! Behaviors can be scripted per call (fail with a given error, stall for
//! a duration) to exercise timeout and failure paths; an empty script
//! means every call succeeds.

use super::errors::{PlanServiceError, PlanServiceErrorCode};
use super::{ChildPlanSummary, CopyPlanRequest, GenerationRequest, PlanProvider, PlanServiceResponse};
use crate::models::{PlanExercise, PlanFilter, ProgramType, SessionLength, WorkoutPlan};
use crate::store::RemoteStore;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Scripted behavior for one provider call
#[derive(Debug, Clone)]
pub enum ScriptedBehavior {
    /// Seed plans and respond normally
    Succeed,
    /// Fail with the given service error
    Fail(PlanServiceError),
    /// Sleep before responding normally, to exercise caller timeouts
    Stall(Duration),
}

/// Deterministic plan provider writing directly to the remote store
pub struct ScriptedPlanProvider {
    store: Arc<dyn RemoteStore>,
    script: Mutex<VecDeque<ScriptedBehavior>>,
}

impl ScriptedPlanProvider {
    /// Create a provider where every call succeeds
    #[must_use]
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            script: Mutex::new(VecDeque::new()),
        }
    }

    /// Create a provider with pre-scripted behaviors, consumed in order;
    /// once the script runs out, calls succeed
    #[must_use]
    pub fn with_script(
        store: Arc<dyn RemoteStore>,
        behaviors: impl IntoIterator<Item = ScriptedBehavior>,
    ) -> Self {
        Self {
            store,
            script: Mutex::new(behaviors.into_iter().collect()),
        }
    }

    /// Append a behavior for a future call
    pub async fn push_behavior(&self, behavior: ScriptedBehavior) {
        self.script.lock().await.push_back(behavior);
    }

    async fn next_behavior(&self) -> ScriptedBehavior {
        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or(ScriptedBehavior::Succeed)
    }

    /// Workouts a split produces
    fn child_workout_names(program_type: ProgramType) -> &'static [&'static str] {
        match program_type {
            ProgramType::Ulul => &["Upper A", "Lower A", "Upper B", "Lower B"],
            ProgramType::Ppl => &["Push Day", "Pull Day", "Leg Day"],
        }
    }

    /// Exercises that fit the preferred session length
    const fn exercises_per_workout(session_length: SessionLength) -> usize {
        match session_length {
            SessionLength::Min15To30 => 3,
            SessionLength::Min30To45 => 4,
            SessionLength::Min45To60 => 5,
            SessionLength::Min60To90 => 6,
        }
    }

    const fn main_program_name(program_type: ProgramType) -> &'static str {
        match program_type {
            ProgramType::Ulul => "Upper/Lower Split",
            ProgramType::Ppl => "Push Pull Legs",
        }
    }

    async fn seed_generated_plans(
        &self,
        request: &GenerationRequest,
    ) -> Result<PlanServiceResponse, PlanServiceError> {
        let gym = self
            .store
            .get_gym(request.gym_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| {
                PlanServiceError::new(
                    PlanServiceErrorCode::InvalidRequest,
                    format!("unknown gym {}", request.gym_id),
                )
            })?;

        let pool = self
            .store
            .list_exercise_pool(request.gym_id)
            .await
            .map_err(store_error)?;

        let main = WorkoutPlan::new_main_program(
            gym.owner_id,
            Self::main_program_name(request.program_type),
        );
        self.store
            .insert_workout_plan(&main)
            .await
            .map_err(store_error)?;

        let per_workout = Self::exercises_per_workout(request.session_length);
        let mut child_plans = Vec::new();
        let mut exercise_count = 0;

        for (workout_index, name) in Self::child_workout_names(request.program_type)
            .iter()
            .enumerate()
        {
            let child = WorkoutPlan::new_child(gym.owner_id, main.id, request.gym_id, *name);
            self.store
                .insert_workout_plan(&child)
                .await
                .map_err(store_error)?;

            let exercises: Vec<PlanExercise> = (0..per_workout)
                .map(|i| {
                    // Draw from the gym's pool round-robin; fresh ids when
                    // the pool is empty
                    let exercise_id = if pool.is_empty() {
                        Uuid::new_v4()
                    } else {
                        pool[(workout_index * per_workout + i) % pool.len()].exercise_id
                    };
                    #[allow(clippy::cast_possible_truncation)]
                    PlanExercise {
                        id: Uuid::new_v4(),
                        plan_id: child.id,
                        exercise_id,
                        order_index: i as u32,
                        is_bonus: per_workout >= 5 && i == per_workout - 1,
                    }
                })
                .collect();
            self.store
                .insert_plan_exercises(&exercises)
                .await
                .map_err(store_error)?;
            exercise_count += exercises.len();

            child_plans.push(ChildPlanSummary {
                id: child.id,
                name: child.name,
            });
        }

        Ok(PlanServiceResponse {
            main_plan_id: main.id,
            child_plans,
            exercise_count,
        })
    }

    async fn seed_copied_plans(
        &self,
        request: &CopyPlanRequest,
    ) -> Result<PlanServiceResponse, PlanServiceError> {
        let source_children = self
            .store
            .list_workout_plans(&PlanFilter::for_gym(request.source_gym_id))
            .await
            .map_err(store_error)?;

        if source_children.is_empty() {
            return Err(PlanServiceError::new(
                PlanServiceErrorCode::NoWorkoutsToCopy,
                format!(
                    "gym {} does not have any workouts to copy",
                    request.source_gym_id
                ),
            ));
        }

        let target = self
            .store
            .get_gym(request.target_gym_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| {
                PlanServiceError::new(
                    PlanServiceErrorCode::InvalidRequest,
                    format!("unknown gym {}", request.target_gym_id),
                )
            })?;

        // All children of a gym share one root main program
        let main_plan_id = match source_children[0].parent_plan_id {
            Some(id) => id,
            None => {
                let main = WorkoutPlan::new_main_program(target.owner_id, "Copied Program");
                self.store
                    .insert_workout_plan(&main)
                    .await
                    .map_err(store_error)?;
                main.id
            }
        };

        let mut child_plans = Vec::new();
        let mut exercise_count = 0;

        for source_child in &source_children {
            let copy = WorkoutPlan::new_child(
                target.owner_id,
                main_plan_id,
                request.target_gym_id,
                source_child.name.clone(),
            );
            self.store
                .insert_workout_plan(&copy)
                .await
                .map_err(store_error)?;

            let source_exercises = self
                .store
                .list_plan_exercises(source_child.id)
                .await
                .map_err(store_error)?;
            let copies: Vec<PlanExercise> = source_exercises
                .iter()
                .map(|exercise| PlanExercise {
                    id: Uuid::new_v4(),
                    plan_id: copy.id,
                    exercise_id: exercise.exercise_id,
                    order_index: exercise.order_index,
                    is_bonus: exercise.is_bonus,
                })
                .collect();
            self.store
                .insert_plan_exercises(&copies)
                .await
                .map_err(store_error)?;
            exercise_count += copies.len();

            child_plans.push(ChildPlanSummary {
                id: copy.id,
                name: copy.name,
            });
        }

        Ok(PlanServiceResponse {
            main_plan_id,
            child_plans,
            exercise_count,
        })
    }
}

/// Store failures surface as internal service errors
fn store_error(error: anyhow::Error) -> PlanServiceError {
    PlanServiceError::new(
        PlanServiceErrorCode::Internal,
        format!("store error: {error}"),
    )
}

#[async_trait]
impl PlanProvider for ScriptedPlanProvider {
    async fn generate_plan(
        &self,
        request: &GenerationRequest,
    ) -> Result<PlanServiceResponse, PlanServiceError> {
        match self.next_behavior().await {
            ScriptedBehavior::Succeed => {}
            ScriptedBehavior::Fail(error) => return Err(error),
            ScriptedBehavior::Stall(duration) => tokio::time::sleep(duration).await,
        }
        self.seed_generated_plans(request).await
    }

    async fn copy_plans(
        &self,
        request: &CopyPlanRequest,
    ) -> Result<PlanServiceResponse, PlanServiceError> {
        match self.next_behavior().await {
            ScriptedBehavior::Succeed => {}
            ScriptedBehavior::Fail(error) => return Err(error),
            ScriptedBehavior::Stall(duration) => tokio::time::sleep(duration).await,
        }
        self.seed_copied_plans(request).await
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}
