// ABOUTME: Integration tests for local plan-mirror synchronization
// ABOUTME: Covers idempotence, per-item failure tolerance, corrective resync, and optimistic rollback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use async_trait::async_trait;
use common::create_test_store;
use gymforge_core::{
    cache::{LocalCache, MemoryCache},
    errors::{AppError, AppResult, ErrorCode},
    models::{PlanExercise, PlanNode, PlanTree, WorkoutPlan},
    services::mirror,
    store::RemoteStore,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// Cache wrapper that fails the first N exercise upserts (and optionally
/// the snapshot replacement), delegating everything else to a real
/// in-memory mirror.
struct FlakyCache {
    inner: MemoryCache,
    exercise_failures_left: AtomicUsize,
    fail_snapshot: bool,
}

impl FlakyCache {
    fn failing_exercises(count: usize) -> Self {
        Self {
            inner: MemoryCache::new(),
            exercise_failures_left: AtomicUsize::new(count),
            fail_snapshot: false,
        }
    }

    fn failing_everything(count: usize) -> Self {
        Self {
            fail_snapshot: true,
            ..Self::failing_exercises(count)
        }
    }
}

#[async_trait]
impl LocalCache for FlakyCache {
    async fn upsert_plan(&self, plan: &WorkoutPlan) -> AppResult<()> {
        self.inner.upsert_plan(plan).await
    }

    async fn upsert_plan_exercise(&self, exercise: &PlanExercise) -> AppResult<()> {
        let left = self.exercise_failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.exercise_failures_left.store(left - 1, Ordering::SeqCst);
            return Err(AppError::sync_failed("injected upsert failure"));
        }
        self.inner.upsert_plan_exercise(exercise).await
    }

    async fn remove_plan_exercise(
        &self,
        plan_id: Uuid,
        exercise_id: Uuid,
        order_index: u32,
    ) -> AppResult<()> {
        self.inner
            .remove_plan_exercise(plan_id, exercise_id, order_index)
            .await
    }

    async fn get_plan(&self, plan_id: Uuid) -> AppResult<Option<WorkoutPlan>> {
        self.inner.get_plan(plan_id).await
    }

    async fn list_plans(&self, owner_id: Uuid) -> AppResult<Vec<WorkoutPlan>> {
        self.inner.list_plans(owner_id).await
    }

    async fn list_plan_exercises(&self, plan_id: Uuid) -> AppResult<Vec<PlanExercise>> {
        self.inner.list_plan_exercises(plan_id).await
    }

    async fn replace_owner_snapshot(
        &self,
        owner_id: Uuid,
        plans: Vec<WorkoutPlan>,
        exercises: Vec<PlanExercise>,
    ) -> AppResult<()> {
        if self.fail_snapshot {
            return Err(AppError::sync_failed("injected snapshot failure"));
        }
        self.inner
            .replace_owner_snapshot(owner_id, plans, exercises)
            .await
    }

    async fn clear(&self) -> AppResult<()> {
        self.inner.clear().await
    }
}

fn exercise_for(plan_id: Uuid, order_index: u32) -> PlanExercise {
    PlanExercise {
        id: Uuid::new_v4(),
        plan_id,
        exercise_id: Uuid::new_v4(),
        order_index,
        is_bonus: false,
    }
}

/// Build a main program with two child workouts and persist every row to
/// the remote store, so corrective resyncs have an authoritative copy to
/// pull from.
async fn seed_tree(store: &dyn RemoteStore, owner: Uuid, gym_id: Uuid) -> Result<PlanTree> {
    let main = WorkoutPlan::new_main_program(owner, "Push Pull Legs");
    store.insert_workout_plan(&main).await?;

    let mut children = Vec::new();
    for name in ["Push Day", "Pull Day"] {
        let child = WorkoutPlan::new_child(owner, main.id, gym_id, name);
        store.insert_workout_plan(&child).await?;
        let exercises = vec![exercise_for(child.id, 0), exercise_for(child.id, 1)];
        store.insert_plan_exercises(&exercises).await?;
        children.push(PlanNode {
            plan: child,
            exercises,
        });
    }

    Ok(PlanTree {
        main: PlanNode {
            plan: main,
            exercises: vec![],
        },
        children,
    })
}

#[tokio::test]
async fn test_clean_mirror_pass_copies_the_whole_tree() -> Result<()> {
    let store = create_test_store().await?;
    let cache = MemoryCache::new();
    let owner = Uuid::new_v4();
    let tree = seed_tree(store.as_ref(), owner, Uuid::new_v4()).await?;

    let report = mirror::mirror(store.as_ref(), &cache, owner, &tree).await?;
    assert!(report.is_clean());
    assert_eq!(report.plans_mirrored, 3);
    assert_eq!(report.exercises_mirrored, 4);
    assert!(!report.corrective_resync);

    assert!(cache.get_plan(tree.main.plan.id).await?.is_some());
    for node in &tree.children {
        assert_eq!(cache.list_plan_exercises(node.plan.id).await?.len(), 2);
    }
    Ok(())
}

#[tokio::test]
async fn test_mirroring_twice_leaves_identical_contents() -> Result<()> {
    let store = create_test_store().await?;
    let cache = MemoryCache::new();
    let owner = Uuid::new_v4();
    let tree = seed_tree(store.as_ref(), owner, Uuid::new_v4()).await?;

    mirror::mirror(store.as_ref(), &cache, owner, &tree).await?;
    let plans_once = cache.list_plans(owner).await?;
    let exercises_once = cache
        .list_plan_exercises(tree.children[0].plan.id)
        .await?;

    mirror::mirror(store.as_ref(), &cache, owner, &tree).await?;
    assert_eq!(cache.list_plans(owner).await?, plans_once);
    assert_eq!(
        cache
            .list_plan_exercises(tree.children[0].plan.id)
            .await?,
        exercises_once
    );
    Ok(())
}

#[tokio::test]
async fn test_item_failures_trigger_a_corrective_resync() -> Result<()> {
    let store = create_test_store().await?;
    let cache = FlakyCache::failing_exercises(2);
    let owner = Uuid::new_v4();
    let tree = seed_tree(store.as_ref(), owner, Uuid::new_v4()).await?;

    let report = mirror::mirror(store.as_ref(), &cache, owner, &tree).await?;
    assert_eq!(report.failed_items, 2);
    assert!(report.corrective_resync);

    // The resync pulled the authoritative copy, so the mirror is whole
    // despite the failed upserts.
    assert_eq!(cache.list_plans(owner).await?.len(), 3);
    for node in &tree.children {
        assert_eq!(cache.list_plan_exercises(node.plan.id).await?.len(), 2);
    }
    Ok(())
}

#[tokio::test]
async fn test_mirror_errors_only_when_the_resync_also_fails() -> Result<()> {
    let store = create_test_store().await?;
    let cache = FlakyCache::failing_everything(1);
    let owner = Uuid::new_v4();
    let tree = seed_tree(store.as_ref(), owner, Uuid::new_v4()).await?;

    let err = mirror::mirror(store.as_ref(), &cache, owner, &tree)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::SyncFailed);
    Ok(())
}

#[tokio::test]
async fn test_full_resync_replaces_stale_mirror_contents() -> Result<()> {
    let store = create_test_store().await?;
    let cache = MemoryCache::new();
    let owner = Uuid::new_v4();
    let tree = seed_tree(store.as_ref(), owner, Uuid::new_v4()).await?;

    // A plan that only exists locally (stale leftover from a deleted tree)
    let stale = WorkoutPlan::new_main_program(owner, "Stale Program");
    cache.upsert_plan(&stale).await?;

    let (plans, exercises) = mirror::full_resync(store.as_ref(), &cache, owner).await?;
    assert_eq!(plans, 3);
    assert_eq!(exercises, 4);
    assert!(cache.get_plan(stale.id).await?.is_none());
    assert!(cache.get_plan(tree.main.plan.id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_link_exercise_writes_mirror_then_remote() -> Result<()> {
    let store = create_test_store().await?;
    let cache = MemoryCache::new();
    let owner = Uuid::new_v4();
    let tree = seed_tree(store.as_ref(), owner, Uuid::new_v4()).await?;

    let plan_id = tree.children[0].plan.id;
    let added = exercise_for(plan_id, 2);
    mirror::link_exercise(store.as_ref(), &cache, &added).await?;

    assert_eq!(cache.list_plan_exercises(plan_id).await?.len(), 1);
    assert_eq!(store.list_plan_exercises(plan_id).await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_link_exercise_rolls_back_mirror_on_remote_failure() -> Result<()> {
    let store = create_test_store().await?;
    let cache = MemoryCache::new();

    // The remote insert fails on the foreign key: no such plan exists.
    let orphan = exercise_for(Uuid::new_v4(), 0);
    let result = mirror::link_exercise(store.as_ref(), &cache, &orphan).await;
    assert!(result.is_err());

    // The optimistic mirror entry was removed again.
    assert!(cache.list_plan_exercises(orphan.plan_id).await?.is_empty());
    Ok(())
}
