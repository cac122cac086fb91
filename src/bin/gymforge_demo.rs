// ABOUTME: End-to-end demo of the gym setup wizard against a local SQLite stack
// ABOUTME: Walks naming, equipment, exercises, profile, and plan generation, then prints the outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! # GymForge Demo Binary
//!
//! Drives one complete setup run: opens the wizard, names a gym, confirms
//! an equipment list and exercise pool, fills the training profile, lets
//! the scripted provider generate a program, and finalizes. The resulting
//! setup outcome is printed as JSON along with the mirrored plan count.
//!
//! Usage:
//! ```bash
//! # Run against an in-memory store
//! cargo run --bin gymforge-demo
//!
//! # Keep the data around and pick the gym name
//! cargo run --bin gymforge-demo -- --database-url sqlite:./data/gymforge.db --gym-name "Garage Gym"
//! ```

use anyhow::Result;
use clap::Parser;
use gymforge_core::{
    cache::memory::MemoryCache,
    config::environment::ServerConfig,
    constants::defaults,
    context::OrchestratorContext,
    logging,
    models::{EquipmentItem, ProfileUpdate, ProgramType, SessionLength},
    providers::scripted::ScriptedPlanProvider,
    services,
    setup::{SetupFlow, SetupOption},
    store::{sqlite::SqliteStore, RemoteStore},
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "gymforge-demo",
    about = "GymForge setup orchestrator demo",
    long_about = "Runs the full gym setup wizard once against a local stack and prints the outcome."
)]
struct Args {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Name for the demo gym
    #[arg(long, default_value = "Garage Gym")]
    gym_name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment, with CLI overrides
    let mut config = ServerConfig::from_env()?;
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting GymForge setup demo");
    info!("{}", config.summary());

    // Remote store
    let store = Arc::new(SqliteStore::new(&config.database.url).await?);
    if config.database.auto_migrate {
        store.migrate().await?;
        info!("Store migrations complete");
    }

    // Local mirror and plan provider; the scripted provider writes real
    // plan rows into the store, so the demo runs without network access
    let cache = Arc::new(MemoryCache::new());
    let provider = Arc::new(ScriptedPlanProvider::new(store.clone()));
    let context = OrchestratorContext::new(
        store.clone(),
        cache.clone(),
        provider,
        Arc::new(config),
    );

    let owner_id = Uuid::new_v4();
    info!("Demo owner: {owner_id}");

    let mut flow = SetupFlow::new(context, owner_id);

    // Walk the wizard end to end
    flow.start_add_gym().await?;
    let gym_id = flow.submit_name(&args.gym_name).await?;
    info!("Created gym {gym_id} ({})", args.gym_name);

    flow.choose_option(SetupOption::AiUpload).await?;

    let equipment: Vec<EquipmentItem> = defaults::DEFAULT_EQUIPMENT
        .iter()
        .copied()
        .map(|(equipment_type, quantity)| EquipmentItem {
            equipment_type: equipment_type.to_owned(),
            quantity,
        })
        .collect();
    flow.confirm_equipment(&equipment).await?;
    info!("Confirmed {} equipment types", equipment.len());

    let exercise_pool: Vec<Uuid> = (0..8).map(|_| Uuid::new_v4()).collect();
    flow.confirm_exercises(&exercise_pool).await?;
    info!("Confirmed {} pool exercises", exercise_pool.len());

    // A fresh owner has no profile yet, so the wizard routes through the
    // profile step before generation
    flow.complete_profile(&ProfileUpdate {
        program_type: Some(ProgramType::Ppl),
        preferred_session_length: Some(SessionLength::Min45To60),
    })
    .await?;

    let generation = flow.generate_plan().await?;
    info!(
        "Generation settled: {}{}",
        generation.status,
        generation
            .message
            .as_deref()
            .map_or_else(String::new, |detail| format!(" ({detail})"))
    );

    let outcome = flow.finish().await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    // Background reap and mirror work must settle before reading the cache
    let failed_tasks = flow.wait_for_background_tasks().await;
    if failed_tasks > 0 {
        warn!("{failed_tasks} background task(s) failed; see log above");
    }

    let gyms = services::gyms::list_gyms_with_status(store.as_ref(), owner_id).await?;
    for entry in &gyms {
        info!(
            "Gym {} ({}): complete={}",
            entry.gym.id, entry.gym.name, entry.is_complete
        );
    }
    info!("Local mirror holds {} plan(s)", cache.plan_count().await);

    Ok(())
}
