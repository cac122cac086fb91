// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides store, context, and data seeding helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `gymforge_core`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use anyhow::Result;
use chrono::{Duration as ChronoDuration, Utc};
use gymforge_core::{
    cache::MemoryCache,
    config::environment::ServerConfig,
    context::OrchestratorContext,
    models::{Equipment, ExercisePoolEntry, Gym, Profile, ProgramType, SessionLength},
    providers::scripted::{ScriptedBehavior, ScriptedPlanProvider},
    store::{sqlite::SqliteStore, RemoteStore},
};
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls the level; default WARN keeps test output quiet
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test store: in-memory SQLite, migrated
pub async fn create_test_store() -> Result<Arc<SqliteStore>> {
    init_test_logging();
    let store = Arc::new(SqliteStore::new("sqlite::memory:").await?);
    store.migrate().await?;
    Ok(store)
}

/// Full orchestrator context over a fresh store, with a scripted provider
/// that consumes `behaviors` in call order (then succeeds)
pub async fn create_test_context(
    behaviors: Vec<ScriptedBehavior>,
) -> Result<(OrchestratorContext, Arc<SqliteStore>, Arc<MemoryCache>)> {
    let store = create_test_store().await?;
    let cache = Arc::new(MemoryCache::new());
    let provider = Arc::new(ScriptedPlanProvider::with_script(
        store.clone() as Arc<dyn RemoteStore>,
        behaviors,
    ));
    let context = OrchestratorContext::new(
        store.clone(),
        cache.clone(),
        provider,
        Arc::new(test_config()),
    );
    Ok((context, store, cache))
}

/// Test configuration with a short generation timeout
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.plan_service.timeout_secs = 1;
    config
}

/// Insert a gym created `age_secs` seconds ago, so reaper ordering is
/// deterministic regardless of how fast the test runs
pub async fn seed_gym_aged(
    store: &dyn RemoteStore,
    owner_id: Uuid,
    name: &str,
    age_secs: i64,
) -> Result<Gym> {
    let mut gym = Gym::new(owner_id, name);
    gym.created_at = Utc::now() - ChronoDuration::seconds(age_secs);
    store.create_gym(&gym).await?;
    Ok(gym)
}

/// Make a gym count as complete by giving it one equipment row
pub async fn make_complete(store: &dyn RemoteStore, gym_id: Uuid) -> Result<()> {
    store
        .insert_equipment(&[Equipment {
            gym_id,
            equipment_type: "barbell".to_owned(),
            quantity: 1,
        }])
        .await
}

/// Seed `count` exercise-pool entries for a gym, returning the catalog ids
pub async fn seed_pool(store: &dyn RemoteStore, gym_id: Uuid, count: usize) -> Result<Vec<Uuid>> {
    let ids: Vec<Uuid> = (0..count).map(|_| Uuid::new_v4()).collect();
    let entries: Vec<ExercisePoolEntry> = ids
        .iter()
        .map(|exercise_id| ExercisePoolEntry {
            gym_id,
            exercise_id: *exercise_id,
        })
        .collect();
    store.insert_exercise_pool_entries(&entries).await?;
    Ok(ids)
}

/// Seed a profile that already has every generation prerequisite
pub async fn seed_ready_profile(
    store: &dyn RemoteStore,
    owner_id: Uuid,
    active_gym_id: Option<Uuid>,
) -> Result<()> {
    let mut profile = Profile::new(owner_id);
    profile.active_gym_id = active_gym_id;
    profile.program_type = Some(ProgramType::Ppl);
    profile.preferred_session_length = Some(SessionLength::Min45To60);
    store.upsert_profile(&profile).await?;
    Ok(())
}
