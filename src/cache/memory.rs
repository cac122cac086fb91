// ABOUTME: In-memory implementation of the local plan mirror
// ABOUTME: RwLock-guarded maps with idempotent upserts and snapshot replacement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

use super::LocalCache;
use crate::errors::AppResult;
use crate::models::{PlanExercise, WorkoutPlan};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Mirrored plan data guarded by one lock
#[derive(Debug, Default)]
struct CacheState {
    /// Plans keyed by plan id
    plans: HashMap<Uuid, WorkoutPlan>,
    /// Exercises grouped by plan id, kept ordered by `order_index`
    exercises: HashMap<Uuid, Vec<PlanExercise>>,
}

/// In-memory plan mirror
///
/// Uses `Arc<RwLock<CacheState>>` so the mirror synchronizer's spawned
/// tasks and the interactive flow can share one instance.
#[derive(Clone, Default)]
pub struct MemoryCache {
    state: Arc<RwLock<CacheState>>,
}

impl MemoryCache {
    /// Create an empty mirror
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mirrored plans, for diagnostics and tests
    pub async fn plan_count(&self) -> usize {
        self.state.read().await.plans.len()
    }
}

#[async_trait]
impl LocalCache for MemoryCache {
    async fn upsert_plan(&self, plan: &WorkoutPlan) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.plans.insert(plan.id, plan.clone());
        Ok(())
    }

    async fn upsert_plan_exercise(&self, exercise: &PlanExercise) -> AppResult<()> {
        let mut state = self.state.write().await;
        let entries = state.exercises.entry(exercise.plan_id).or_default();

        // Duplicate (plan_id, exercise_id, order_index) keys are no-ops
        let duplicate = entries.iter().any(|existing| {
            existing.exercise_id == exercise.exercise_id
                && existing.order_index == exercise.order_index
        });
        if duplicate {
            return Ok(());
        }

        entries.push(exercise.clone());
        entries.sort_by_key(|e| e.order_index);
        Ok(())
    }

    async fn remove_plan_exercise(
        &self,
        plan_id: Uuid,
        exercise_id: Uuid,
        order_index: u32,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        if let Some(entries) = state.exercises.get_mut(&plan_id) {
            entries.retain(|existing| {
                existing.exercise_id != exercise_id || existing.order_index != order_index
            });
        }
        Ok(())
    }

    async fn get_plan(&self, plan_id: Uuid) -> AppResult<Option<WorkoutPlan>> {
        let state = self.state.read().await;
        Ok(state.plans.get(&plan_id).cloned())
    }

    async fn list_plans(&self, owner_id: Uuid) -> AppResult<Vec<WorkoutPlan>> {
        let state = self.state.read().await;
        let mut plans: Vec<WorkoutPlan> = state
            .plans
            .values()
            .filter(|plan| plan.owner_id == owner_id)
            .cloned()
            .collect();
        plans.sort_by_key(|plan| (plan.created_at, plan.id));
        Ok(plans)
    }

    async fn list_plan_exercises(&self, plan_id: Uuid) -> AppResult<Vec<PlanExercise>> {
        let state = self.state.read().await;
        Ok(state.exercises.get(&plan_id).cloned().unwrap_or_default())
    }

    async fn replace_owner_snapshot(
        &self,
        owner_id: Uuid,
        plans: Vec<WorkoutPlan>,
        exercises: Vec<PlanExercise>,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;

        let owned: Vec<Uuid> = state
            .plans
            .values()
            .filter(|plan| plan.owner_id == owner_id)
            .map(|plan| plan.id)
            .collect();
        for plan_id in owned {
            state.plans.remove(&plan_id);
            state.exercises.remove(&plan_id);
        }

        for plan in plans {
            state.plans.insert(plan.id, plan);
        }
        for exercise in exercises {
            let entries = state.exercises.entry(exercise.plan_id).or_default();
            let duplicate = entries.iter().any(|existing| {
                existing.exercise_id == exercise.exercise_id
                    && existing.order_index == exercise.order_index
            });
            if !duplicate {
                entries.push(exercise);
            }
        }
        for entries in state.exercises.values_mut() {
            entries.sort_by_key(|e| e.order_index);
        }

        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.plans.clear();
        state.exercises.clear();
        Ok(())
    }
}
