// ABOUTME: Gym setup wizard: pure step machine, async flow controller, background tasks
// ABOUTME: The machine decides legality and effects; the controller executes them with real services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! # Gym Setup Wizard
//!
//! The wizard is split in two. [`machine`] is a pure step machine:
//! `transition(step, event)` either rejects the event or returns the next
//! step plus the effects the caller must perform, with no IO anywhere, so
//! every path is unit-testable. [`SetupFlow`] is the async controller that
//! drives the machine, executes the effects against the injected store,
//! cache, and plan provider, and owns the in-progress gym id, the
//! cancellation flag, and the [`BackgroundTasks`] handle for spawned
//! reap and mirror work.

pub mod background;
pub mod controller;
pub mod machine;

pub use background::BackgroundTasks;
pub use controller::{CancelHandle, SetupFlow};
pub use machine::{Effect, SetupEvent, SetupOption, SetupStep, Transition};
