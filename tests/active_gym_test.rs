// ABOUTME: Integration tests for active-gym replacement resolution
// ABOUTME: Covers the complete-first preference, oldest fallback, and persist-before-delete behavior
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{create_test_store, make_complete, seed_gym_aged, seed_ready_profile};
use gymforge_core::{services::active_gym, store::RemoteStore};
use uuid::Uuid;

#[tokio::test]
async fn test_prefers_a_complete_gym_over_an_older_draft() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let leaving = seed_gym_aged(store.as_ref(), owner, "Leaving", 300).await?;
    seed_gym_aged(store.as_ref(), owner, "Older draft", 200).await?;
    let complete = seed_gym_aged(store.as_ref(), owner, "Equipped", 100).await?;
    make_complete(store.as_ref(), complete.id).await?;
    seed_ready_profile(store.as_ref(), owner, Some(leaving.id)).await?;

    let replacement =
        active_gym::resolve_replacement(store.as_ref(), owner, leaving.id).await?;
    assert_eq!(replacement, Some(complete.id));

    let profile = store.get_profile(owner).await?.unwrap();
    assert_eq!(profile.active_gym_id, Some(complete.id));
    Ok(())
}

#[tokio::test]
async fn test_falls_back_to_the_oldest_remaining_draft() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let leaving = seed_gym_aged(store.as_ref(), owner, "Leaving", 300).await?;
    let oldest = seed_gym_aged(store.as_ref(), owner, "Oldest draft", 200).await?;
    seed_gym_aged(store.as_ref(), owner, "Newer draft", 100).await?;
    seed_ready_profile(store.as_ref(), owner, Some(leaving.id)).await?;

    let replacement =
        active_gym::resolve_replacement(store.as_ref(), owner, leaving.id).await?;
    assert_eq!(replacement, Some(oldest.id));
    Ok(())
}

#[tokio::test]
async fn test_returns_none_and_persists_nothing_without_other_gyms() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let only = seed_gym_aged(store.as_ref(), owner, "Only", 10).await?;
    seed_ready_profile(store.as_ref(), owner, Some(only.id)).await?;

    let replacement = active_gym::resolve_replacement(store.as_ref(), owner, only.id).await?;
    assert_eq!(replacement, None);

    // The caller must refuse the deletion; the pointer is untouched.
    let profile = store.get_profile(owner).await?.unwrap();
    assert_eq!(profile.active_gym_id, Some(only.id));
    Ok(())
}

#[tokio::test]
async fn test_excluded_gym_is_never_chosen() -> Result<()> {
    let store = create_test_store().await?;
    let owner = Uuid::new_v4();
    let excluded = seed_gym_aged(store.as_ref(), owner, "Excluded", 200).await?;
    make_complete(store.as_ref(), excluded.id).await?;
    let draft = seed_gym_aged(store.as_ref(), owner, "Draft", 100).await?;
    seed_ready_profile(store.as_ref(), owner, Some(excluded.id)).await?;

    // Even though the excluded gym is the only complete one, the resolver
    // must pick the remaining draft.
    let replacement =
        active_gym::resolve_replacement(store.as_ref(), owner, excluded.id).await?;
    assert_eq!(replacement, Some(draft.id));
    Ok(())
}
