// ABOUTME: Dependency injection context bundling the orchestrator's collaborators
// ABOUTME: Holds the remote store, local mirror, plan provider, and configuration behind Arcs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! Focused dependency injection for the orchestrator
//!
//! Everything the setup flow and background tasks need travels in one
//! cloneable context: the authoritative [`RemoteStore`], the on-device
//! [`LocalCache`] mirror, the [`PlanProvider`] the wizard calls, and the
//! resolved [`ServerConfig`].

use std::sync::Arc;

use crate::cache::LocalCache;
use crate::config::ServerConfig;
use crate::providers::PlanProvider;
use crate::store::RemoteStore;

/// Shared dependencies for setup orchestration
///
/// # Dependencies
/// - `store`: authoritative remote persistence for gyms, plans, profiles
/// - `cache`: local plan mirror kept in sync by the mirror service
/// - `plan_provider`: plan-generation service client
/// - `config`: resolved runtime configuration
#[derive(Clone)]
pub struct OrchestratorContext {
    store: Arc<dyn RemoteStore>,
    cache: Arc<dyn LocalCache>,
    plan_provider: Arc<dyn PlanProvider>,
    config: Arc<ServerConfig>,
}

impl OrchestratorContext {
    /// Create a new orchestrator context
    #[must_use]
    pub const fn new(
        store: Arc<dyn RemoteStore>,
        cache: Arc<dyn LocalCache>,
        plan_provider: Arc<dyn PlanProvider>,
        config: Arc<ServerConfig>,
    ) -> Self {
        Self {
            store,
            cache,
            plan_provider,
            config,
        }
    }

    /// Get the authoritative remote store
    #[must_use]
    pub const fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    /// Get the local plan mirror
    #[must_use]
    pub const fn cache(&self) -> &Arc<dyn LocalCache> {
        &self.cache
    }

    /// Get the plan-generation service client
    #[must_use]
    pub const fn plan_provider(&self) -> &Arc<dyn PlanProvider> {
        &self.plan_provider
    }

    /// Get the resolved runtime configuration
    #[must_use]
    pub const fn config(&self) -> &Arc<ServerConfig> {
        &self.config
    }
}
