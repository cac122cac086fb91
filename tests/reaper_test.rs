// ABOUTME: Integration tests for the background incomplete-gym reap pass
// ABOUTME: Covers preservation rules, floor enforcement, protection, and active-gym repair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{create_test_store, make_complete, seed_gym_aged, seed_ready_profile};
use gymforge_core::{
    services::reaper::{self, ReapScope},
    store::RemoteStore,
};
use uuid::Uuid;

#[tokio::test]
async fn test_no_incomplete_gyms_deletes_nothing() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let a = seed_gym_aged(store.as_ref(), owner, "Home", 200).await?;
    let b = seed_gym_aged(store.as_ref(), owner, "Office", 100).await?;
    make_complete(store.as_ref(), a.id).await?;
    make_complete(store.as_ref(), b.id).await?;

    let deleted = reaper::reap(store.as_ref(), owner, &ReapScope::background()).await?;
    assert_eq!(deleted, 0);
    assert_eq!(store.list_gyms(owner).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_only_gym_survives_even_when_incomplete() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let only = seed_gym_aged(store.as_ref(), owner, "Draft", 100).await?;

    let deleted = reaper::reap(store.as_ref(), owner, &ReapScope::background()).await?;
    assert_eq!(deleted, 0);

    let remaining = store.list_gyms(owner).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, only.id);
    Ok(())
}

#[tokio::test]
async fn test_all_incomplete_keeps_only_the_oldest() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let oldest = seed_gym_aged(store.as_ref(), owner, "First", 300).await?;
    seed_gym_aged(store.as_ref(), owner, "Second", 200).await?;
    seed_gym_aged(store.as_ref(), owner, "Third", 100).await?;

    let deleted = reaper::reap(store.as_ref(), owner, &ReapScope::background()).await?;
    assert_eq!(deleted, 2);

    let remaining = store.list_gyms(owner).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, oldest.id);
    Ok(())
}

#[tokio::test]
async fn test_active_pointer_moves_before_incomplete_active_gym_dies() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let stale = seed_gym_aged(store.as_ref(), owner, "Stale", 200).await?;
    let complete = seed_gym_aged(store.as_ref(), owner, "Equipped", 100).await?;
    make_complete(store.as_ref(), complete.id).await?;
    seed_ready_profile(store.as_ref(), owner, Some(stale.id)).await?;

    let deleted = reaper::reap(store.as_ref(), owner, &ReapScope::background()).await?;
    assert_eq!(deleted, 1);

    let profile = store.get_profile(owner).await?.unwrap();
    assert_eq!(profile.active_gym_id, Some(complete.id));
    assert!(store.get_gym(stale.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_protected_gym_is_never_in_the_deletion_set() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let complete = seed_gym_aged(store.as_ref(), owner, "Equipped", 300).await?;
    make_complete(store.as_ref(), complete.id).await?;
    let stale = seed_gym_aged(store.as_ref(), owner, "Stale", 200).await?;
    let in_progress = seed_gym_aged(store.as_ref(), owner, "Mid-setup", 100).await?;

    let deleted = reaper::reap(
        store.as_ref(),
        owner,
        &ReapScope::background_protecting(in_progress.id),
    )
    .await?;

    // The stale draft goes; the gym whose wizard is open stays, incomplete
    // as it is.
    assert_eq!(deleted, 1);
    assert!(store.get_gym(in_progress.id).await?.is_some());
    assert!(store.get_gym(stale.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_protection_also_applies_when_everything_is_incomplete() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let oldest = seed_gym_aged(store.as_ref(), owner, "Oldest draft", 300).await?;
    let middle = seed_gym_aged(store.as_ref(), owner, "Middle draft", 200).await?;
    let in_progress = seed_gym_aged(store.as_ref(), owner, "Mid-setup", 100).await?;

    let deleted = reaper::reap(
        store.as_ref(),
        owner,
        &ReapScope::background_protecting(in_progress.id),
    )
    .await?;

    assert_eq!(deleted, 1);
    assert!(store.get_gym(oldest.id).await?.is_some());
    assert!(store.get_gym(middle.id).await?.is_none());
    assert!(store.get_gym(in_progress.id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_floor_check_is_all_or_nothing() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let complete = seed_gym_aged(store.as_ref(), owner, "Equipped", 200).await?;
    make_complete(store.as_ref(), complete.id).await?;
    let stale = seed_gym_aged(store.as_ref(), owner, "Stale", 100).await?;

    // A setup is in progress but its gym row does not exist yet (the user
    // is still on the naming step), so two gyms must survive the pass.
    // Deleting the stale draft would leave one; the pass deletes nothing.
    let deleted = reaper::reap(
        store.as_ref(),
        owner,
        &ReapScope::background_protecting(Uuid::new_v4()),
    )
    .await?;
    assert_eq!(deleted, 0);
    assert_eq!(store.list_gyms(owner).await?.len(), 2);

    // Without a setup in progress the same sweep proceeds.
    let deleted = reaper::reap(store.as_ref(), owner, &ReapScope::background()).await?;
    assert_eq!(deleted, 1);
    assert!(store.get_gym(stale.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_gym_floor_holds_after_every_pass() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    seed_gym_aged(store.as_ref(), owner, "A", 300).await?;
    seed_gym_aged(store.as_ref(), owner, "B", 200).await?;
    seed_gym_aged(store.as_ref(), owner, "C", 100).await?;

    // Run the sweep repeatedly; the count never drops below one.
    for _ in 0..3 {
        reaper::reap(store.as_ref(), owner, &ReapScope::background()).await?;
        assert!(!store.list_gyms(owner).await?.is_empty());
    }
    Ok(())
}

#[tokio::test]
async fn test_reap_is_scoped_to_one_owner() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let neighbor = Uuid::new_v4();
    seed_gym_aged(store.as_ref(), owner, "Mine old", 200).await?;
    seed_gym_aged(store.as_ref(), owner, "Mine new", 100).await?;
    let theirs = seed_gym_aged(store.as_ref(), neighbor, "Theirs", 150).await?;

    let deleted = reaper::reap(store.as_ref(), owner, &ReapScope::background()).await?;
    assert_eq!(deleted, 1);
    assert!(store.get_gym(theirs.id).await?.is_some());
    Ok(())
}
