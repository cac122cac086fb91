// ABOUTME: Integration tests for gym lifecycle operations outside the wizard
// ABOUTME: Covers create, rename, explicit delete with cascade, setup copy, and the gym switcher listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{create_test_store, make_complete, seed_gym_aged, seed_pool, seed_ready_profile};
use gymforge_core::{
    errors::ErrorCode,
    models::{PlanFilter, WorkoutPlan},
    services::gyms,
    store::{sqlite::SqliteStore, RemoteStore},
};
use uuid::Uuid;

#[tokio::test]
async fn test_create_gym_trims_the_name() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();

    let gym = gyms::create_gym(store.as_ref(), owner, "  Garage Gym  ").await?;
    assert_eq!(gym.name, "Garage Gym");
    assert_eq!(store.count_gyms(owner).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_create_gym_enforces_the_cap() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    for name in ["A", "B", "C"] {
        gyms::create_gym(store.as_ref(), owner, name).await?;
    }

    let err = gyms::create_gym(store.as_ref(), owner, "D").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::GymCapReached);
    assert_eq!(store.count_gyms(owner).await?, 3);

    // The cap is per user, not global.
    let neighbor = Uuid::new_v4();
    assert!(gyms::create_gym(store.as_ref(), neighbor, "Theirs").await.is_ok());
    Ok(())
}

#[tokio::test]
async fn test_rename_is_scoped_to_the_owner() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let gym = gyms::create_gym(store.as_ref(), owner, "Old Name").await?;

    let renamed = gyms::rename_gym(store.as_ref(), owner, gym.id, "New Name").await?;
    assert_eq!(renamed.name, "New Name");
    assert_eq!(store.get_gym(gym.id).await?.unwrap().name, "New Name");

    let err = gyms::rename_gym(store.as_ref(), Uuid::new_v4(), gym.id, "Stolen")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotOwner);

    let err = gyms::rename_gym(store.as_ref(), owner, gym.id, "  ")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    Ok(())
}

#[tokio::test]
async fn test_explicit_delete_refuses_the_last_gym() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let only = gyms::create_gym(store.as_ref(), owner, "Only").await?;

    let err = gyms::delete_gym(store.as_ref(), owner, only.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::GymFloorViolation);
    assert!(store.get_gym(only.id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_delete_cascades_through_every_dependent_row() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let keeper = seed_gym_aged(store.as_ref(), owner, "Keeper", 200).await?;
    make_complete(store.as_ref(), keeper.id).await?;
    let doomed = seed_gym_aged(store.as_ref(), owner, "Doomed", 100).await?;
    make_complete(store.as_ref(), doomed.id).await?;
    seed_pool(store.as_ref(), doomed.id, 3).await?;

    let main = WorkoutPlan::new_main_program(owner, "Program");
    store.insert_workout_plan(&main).await?;
    let child = WorkoutPlan::new_child(owner, main.id, doomed.id, "Workout");
    store.insert_workout_plan(&child).await?;

    gyms::delete_gym(store.as_ref(), owner, doomed.id).await?;

    assert!(store.get_gym(doomed.id).await?.is_none());
    assert!(!store.has_equipment(doomed.id).await?);
    assert!(!store.has_exercise_pool_entries(doomed.id).await?);
    assert!(store
        .list_workout_plans(&PlanFilter::for_gym(doomed.id))
        .await?
        .is_empty());
    // The root main program is shared and survives the gym.
    assert!(store.get_workout_plan(main.id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_deleting_the_active_gym_repairs_the_pointer_first() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let survivor = seed_gym_aged(store.as_ref(), owner, "Survivor", 200).await?;
    make_complete(store.as_ref(), survivor.id).await?;
    let active = seed_gym_aged(store.as_ref(), owner, "Active", 100).await?;
    make_complete(store.as_ref(), active.id).await?;
    seed_ready_profile(store.as_ref(), owner, Some(active.id)).await?;

    gyms::delete_gym(store.as_ref(), owner, active.id).await?;

    let profile = store.get_profile(owner).await?.unwrap();
    assert_eq!(profile.active_gym_id, Some(survivor.id));
    Ok(())
}

#[tokio::test]
async fn test_copy_setup_transfers_equipment_and_pool() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let source = seed_gym_aged(store.as_ref(), owner, "Source", 200).await?;
    make_complete(store.as_ref(), source.id).await?;
    let pool_ids = seed_pool(store.as_ref(), source.id, 5).await?;
    let target = seed_gym_aged(store.as_ref(), owner, "Target", 100).await?;

    let report = gyms::copy_setup(store.as_ref(), owner, source.id, target.id).await?;
    assert!(report.complete);
    assert_eq!(report.equipment_copied, 1);
    assert_eq!(report.pool_copied, 5);

    let copied = store.list_exercise_pool(target.id).await?;
    assert_eq!(copied.len(), pool_ids.len());
    assert!(copied.iter().all(|entry| pool_ids.contains(&entry.exercise_id)));
    Ok(())
}

#[tokio::test]
async fn test_copy_setup_rejects_self_copy() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let gym = gyms::create_gym(store.as_ref(), owner, "Gym").await?;

    let err = gyms::copy_setup(store.as_ref(), owner, gym.id, gym.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    Ok(())
}

#[tokio::test]
async fn test_set_active_gym_validates_ownership() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let gym = gyms::create_gym(store.as_ref(), owner, "Gym").await?;
    seed_ready_profile(store.as_ref(), owner, None).await?;

    gyms::set_active_gym(store.as_ref(), owner, gym.id).await?;
    let profile = store.get_profile(owner).await?.unwrap();
    assert_eq!(profile.active_gym_id, Some(gym.id));

    let err = gyms::set_active_gym(store.as_ref(), Uuid::new_v4(), gym.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotOwner);

    let err = gyms::set_active_gym(store.as_ref(), owner, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    Ok(())
}

#[tokio::test]
async fn test_listing_reports_completeness_oldest_first() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let old_draft = seed_gym_aged(store.as_ref(), owner, "Draft", 200).await?;
    let equipped = seed_gym_aged(store.as_ref(), owner, "Equipped", 100).await?;
    make_complete(store.as_ref(), equipped.id).await?;

    let listing = gyms::list_gyms_with_status(store.as_ref(), owner).await?;
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].gym.id, old_draft.id);
    assert!(!listing[0].is_complete);
    assert_eq!(listing[1].gym.id, equipped.id);
    assert!(listing[1].is_complete);
    Ok(())
}

#[tokio::test]
async fn test_store_survives_a_reconnect_on_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite:{}", dir.path().join("gymforge.db").display());

    let owner = Uuid::new_v4();
    let gym_id = {
        let store = SqliteStore::new(&url).await?;
        store.migrate().await?;
        let gym = gyms::create_gym(&store, owner, "Home").await?;
        make_complete(&store, gym.id).await?;
        gym.id
    };

    // A fresh pool over the same file sees everything the first one wrote
    let store = SqliteStore::new(&url).await?;
    store.migrate().await?;
    let gyms = store.list_gyms(owner).await?;
    assert_eq!(gyms.len(), 1);
    assert_eq!(gyms[0].id, gym_id);
    assert_eq!(store.list_equipment(gym_id).await?.len(), 1);
    Ok(())
}
