// ABOUTME: Core data models for gym profiles, workout plans, and user profiles
// ABOUTME: Defines Gym, Equipment, WorkoutPlan, PlanExercise, Profile and wizard outcome types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

//! # Data Models
//!
//! Core data structures shared by the orchestrator, the remote store, and
//! the local mirror.
//!
//! ## Design Principles
//!
//! - **Store agnostic**: the same structs travel through the sqlite-backed
//!   remote store and the in-memory cache
//! - **Serializable**: all models support JSON serialization for the API
//!   and cache layers
//! - **Type safe**: program types and session lengths are enums with fixed
//!   wire names, not free strings
//!
//! ## Core Models
//!
//! - [`Gym`]: a per-location equipment profile (at most 3 per user)
//! - [`Equipment`] / [`ExercisePoolEntry`]: per-gym configuration rows
//! - [`WorkoutPlan`] / [`PlanExercise`]: the two-level generated plan tree
//! - [`Profile`]: the per-user aggregate holding the active-gym pointer
//! - [`SetupOutcome`]: the discriminated result surfaced to the UI layer

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Training program split requested from the plan-generation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgramType {
    /// Upper/lower/upper/lower split
    #[serde(rename = "ulul")]
    Ulul,
    /// Push/pull/legs split
    #[serde(rename = "ppl")]
    Ppl,
}

impl Display for ProgramType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Ulul => write!(f, "ulul"),
            Self::Ppl => write!(f, "ppl"),
        }
    }
}

impl FromStr for ProgramType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ulul" => Ok(Self::Ulul),
            "ppl" => Ok(Self::Ppl),
            other => Err(AppError::invalid_input(format!(
                "unknown program type '{other}', expected 'ulul' or 'ppl'"
            ))),
        }
    }
}

/// Preferred workout session length in minutes, as offered by the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionLength {
    /// 15 to 30 minutes
    #[serde(rename = "15-30")]
    Min15To30,
    /// 30 to 45 minutes
    #[serde(rename = "30-45")]
    Min30To45,
    /// 45 to 60 minutes
    #[serde(rename = "45-60")]
    Min45To60,
    /// 60 to 90 minutes
    #[serde(rename = "60-90")]
    Min60To90,
}

impl Display for SessionLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Min15To30 => write!(f, "15-30"),
            Self::Min30To45 => write!(f, "30-45"),
            Self::Min45To60 => write!(f, "45-60"),
            Self::Min60To90 => write!(f, "60-90"),
        }
    }
}

impl FromStr for SessionLength {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "15-30" => Ok(Self::Min15To30),
            "30-45" => Ok(Self::Min30To45),
            "45-60" => Ok(Self::Min45To60),
            "60-90" => Ok(Self::Min60To90),
            other => Err(AppError::invalid_input(format!(
                "unknown session length '{other}'"
            ))),
        }
    }
}

/// A named per-location equipment profile owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gym {
    /// Unique gym identifier
    pub id: Uuid,
    /// Owning user
    pub owner_id: Uuid,
    /// Display name; the only field ever mutated after creation
    pub name: String,
    /// Creation timestamp; orders gyms for reaper decisions
    pub created_at: DateTime<Utc>,
}

impl Gym {
    /// Create a new gym owned by `owner_id`
    #[must_use]
    pub fn new(owner_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// One equipment row attached to a gym
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    /// Gym this equipment belongs to
    pub gym_id: Uuid,
    /// Free-form equipment type (e.g. "barbell", "cable machine")
    pub equipment_type: String,
    /// How many units the location has
    pub quantity: u32,
}

/// Equipment description not yet bound to a gym (wizard input, defaults,
/// AI-detection handoff)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    /// Free-form equipment type
    pub equipment_type: String,
    /// How many units
    pub quantity: u32,
}

impl EquipmentItem {
    /// Bind this item to a gym, producing the storable row
    #[must_use]
    pub fn for_gym(&self, gym_id: Uuid) -> Equipment {
        Equipment {
            gym_id,
            equipment_type: self.equipment_type.clone(),
            quantity: self.quantity,
        }
    }
}

/// Link row between a gym and an exercise from the global catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExercisePoolEntry {
    /// Gym whose pool contains the exercise
    pub gym_id: Uuid,
    /// Catalog exercise identifier
    pub exercise_id: Uuid,
}

/// A node in the two-level workout-plan tree
///
/// Exactly one root "main program" per (owner, program) with
/// `parent_plan_id = None` and `gym_id = None`; child workouts carry
/// `parent_plan_id = Some(root)` and `gym_id = Some(gym)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Unique plan identifier
    pub id: Uuid,
    /// Owning user
    pub owner_id: Uuid,
    /// Display name
    pub name: String,
    /// Root plan this workout belongs to; `None` for the main program
    pub parent_plan_id: Option<Uuid>,
    /// Gym this workout targets; `None` for the main program
    pub gym_id: Option<Uuid>,
    /// Whether this node is the root main program
    pub is_main_program: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl WorkoutPlan {
    /// Create a root main program (no parent, no gym)
    #[must_use]
    pub fn new_main_program(owner_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            parent_plan_id: None,
            gym_id: None,
            is_main_program: true,
            created_at: Utc::now(),
        }
    }

    /// Create a child workout under `parent_plan_id`, targeting `gym_id`
    #[must_use]
    pub fn new_child(
        owner_id: Uuid,
        parent_plan_id: Uuid,
        gym_id: Uuid,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            parent_plan_id: Some(parent_plan_id),
            gym_id: Some(gym_id),
            is_main_program: false,
            created_at: Utc::now(),
        }
    }
}

/// One ordered exercise inside a workout plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanExercise {
    /// Unique row identifier
    pub id: Uuid,
    /// Plan this exercise belongs to
    pub plan_id: Uuid,
    /// Catalog exercise identifier
    pub exercise_id: Uuid,
    /// Position within the plan; unique per plan
    pub order_index: u32,
    /// Bonus exercises are optional extras appended after the core work
    pub is_bonus: bool,
}

/// Filter for querying workout plans from the remote store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanFilter {
    /// Restrict to plans owned by this user
    pub owner_id: Option<Uuid>,
    /// Restrict to child workouts targeting this gym
    pub gym_id: Option<Uuid>,
    /// Restrict to children of this root plan
    pub parent_plan_id: Option<Uuid>,
    /// Restrict to roots (`true`) or children (`false`)
    pub is_main_program: Option<bool>,
}

impl PlanFilter {
    /// All plans owned by `owner_id`
    #[must_use]
    pub fn for_owner(owner_id: Uuid) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Self::default()
        }
    }

    /// Child workouts under the given root plan
    #[must_use]
    pub fn children_of(parent_plan_id: Uuid) -> Self {
        Self {
            parent_plan_id: Some(parent_plan_id),
            ..Self::default()
        }
    }

    /// Child workouts targeting the given gym
    #[must_use]
    pub fn for_gym(gym_id: Uuid) -> Self {
        Self {
            gym_id: Some(gym_id),
            ..Self::default()
        }
    }
}

/// A plan together with its ordered exercises
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanNode {
    /// The plan row
    pub plan: WorkoutPlan,
    /// Exercises ordered by `order_index`
    pub exercises: Vec<PlanExercise>,
}

/// The full generated plan tree handed from the generation coordinator to
/// the local mirror: one main program and its child workouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTree {
    /// The root main program
    pub main: PlanNode,
    /// Gym-specific child workouts
    pub children: Vec<PlanNode>,
}

impl PlanTree {
    /// Total number of plan rows in the tree
    #[must_use]
    pub fn plan_count(&self) -> usize {
        1 + self.children.len()
    }

    /// Total number of plan-exercise rows in the tree
    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.main.exercises.len()
            + self
                .children
                .iter()
                .map(|node| node.exercises.len())
                .sum::<usize>()
    }

    /// Iterate over every node, main program first
    pub fn nodes(&self) -> impl Iterator<Item = &PlanNode> {
        std::iter::once(&self.main).chain(self.children.iter())
    }
}

/// Per-user aggregate carrying the active-gym pointer and the program
/// preferences plan generation requires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Owning user; exactly one profile per user
    pub owner_id: Uuid,
    /// Gym the session currently targets; must reference an owned gym
    pub active_gym_id: Option<Uuid>,
    /// Chosen training split, if collected
    pub program_type: Option<ProgramType>,
    /// Preferred session length, if collected
    pub preferred_session_length: Option<SessionLength>,
}

impl Profile {
    /// Create an empty profile for `owner_id`
    #[must_use]
    pub fn new(owner_id: Uuid) -> Self {
        Self {
            owner_id,
            active_gym_id: None,
            program_type: None,
            preferred_session_length: None,
        }
    }

    /// Whether both fields plan generation requires are present
    #[must_use]
    pub fn has_generation_prerequisites(&self) -> bool {
        self.program_type.is_some() && self.preferred_session_length.is_some()
    }

    /// Names of the generation-prerequisite fields still missing
    #[must_use]
    pub fn missing_generation_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.program_type.is_none() {
            missing.push("program_type");
        }
        if self.preferred_session_length.is_none() {
            missing.push("preferred_session_length");
        }
        missing
    }
}

/// Partial profile update applied by the wizard's profile-collection step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New program type, if provided
    pub program_type: Option<ProgramType>,
    /// New session length, if provided
    pub preferred_session_length: Option<SessionLength>,
}

/// A gym paired with its derived completeness, for the gym switcher UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GymWithStatus {
    /// The gym row
    pub gym: Gym,
    /// Whether the gym has any equipment, pool entry, or plan
    pub is_complete: bool,
}

/// Final status of a wizard run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetupStatus {
    /// Gym finalized with a generated plan mirrored (or mirroring)
    Success,
    /// Gym finalized; plan generation deferred to a management screen
    Deferred,
    /// User cancelled; the in-progress gym was cleaned up
    Cancelled,
    /// Setup aborted with an error after remediation
    Error,
}

impl Display for SetupStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Success => write!(f, "success"),
            Self::Deferred => write!(f, "deferred"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Discriminated wizard result surfaced to the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupOutcome {
    /// Final status of the run
    pub status: SetupStatus,
    /// The gym the run produced (absent when cancelled before naming or
    /// cleaned up)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gym_id: Option<Uuid>,
    /// Optional human-readable detail (deferral reason, copy report)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SetupOutcome {
    /// Successful finalization of `gym_id`
    #[must_use]
    pub fn success(gym_id: Uuid) -> Self {
        Self {
            status: SetupStatus::Success,
            gym_id: Some(gym_id),
            message: None,
        }
    }

    /// Finalized without a plan; generation deferred
    #[must_use]
    pub fn deferred(gym_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            status: SetupStatus::Deferred,
            gym_id: Some(gym_id),
            message: Some(message.into()),
        }
    }

    /// Cancelled by the user
    #[must_use]
    pub fn cancelled(gym_id: Option<Uuid>) -> Self {
        Self {
            status: SetupStatus::Cancelled,
            gym_id,
            message: None,
        }
    }

    /// Aborted with an error after cleanup
    #[must_use]
    pub fn error(gym_id: Option<Uuid>, message: impl Into<String>) -> Self {
        Self {
            status: SetupStatus::Error,
            gym_id,
            message: Some(message.into()),
        }
    }

    /// Attach a detail message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_type_wire_names() {
        assert_eq!(serde_json::to_string(&ProgramType::Ulul).unwrap(), "\"ulul\"");
        assert_eq!(serde_json::to_string(&ProgramType::Ppl).unwrap(), "\"ppl\"");
        assert_eq!("ppl".parse::<ProgramType>().unwrap(), ProgramType::Ppl);
        assert!("upper-lower".parse::<ProgramType>().is_err());
    }

    #[test]
    fn test_session_length_wire_names() {
        let lengths = [
            (SessionLength::Min15To30, "15-30"),
            (SessionLength::Min30To45, "30-45"),
            (SessionLength::Min45To60, "45-60"),
            (SessionLength::Min60To90, "60-90"),
        ];
        for (length, wire) in lengths {
            assert_eq!(length.to_string(), wire);
            assert_eq!(wire.parse::<SessionLength>().unwrap(), length);
        }
    }

    #[test]
    fn test_plan_tree_counts() {
        let owner = Uuid::new_v4();
        let gym = Uuid::new_v4();
        let main = WorkoutPlan::new_main_program(owner, "Push Pull Legs");
        let child = WorkoutPlan::new_child(owner, main.id, gym, "Push Day");
        let exercise = PlanExercise {
            id: Uuid::new_v4(),
            plan_id: child.id,
            exercise_id: Uuid::new_v4(),
            order_index: 0,
            is_bonus: false,
        };

        let tree = PlanTree {
            main: PlanNode {
                plan: main,
                exercises: vec![],
            },
            children: vec![PlanNode {
                plan: child,
                exercises: vec![exercise],
            }],
        };

        assert_eq!(tree.plan_count(), 2);
        assert_eq!(tree.exercise_count(), 1);
        assert_eq!(tree.nodes().count(), 2);
    }

    #[test]
    fn test_profile_prerequisites() {
        let mut profile = Profile::new(Uuid::new_v4());
        assert!(!profile.has_generation_prerequisites());
        assert_eq!(
            profile.missing_generation_fields(),
            vec!["program_type", "preferred_session_length"]
        );

        profile.program_type = Some(ProgramType::Ulul);
        assert_eq!(
            profile.missing_generation_fields(),
            vec!["preferred_session_length"]
        );

        profile.preferred_session_length = Some(SessionLength::Min30To45);
        assert!(profile.has_generation_prerequisites());
    }

    #[test]
    fn test_setup_outcome_serialization() {
        let gym_id = Uuid::new_v4();
        let outcome = SetupOutcome::deferred(gym_id, "plan generation timed out");
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"deferred\""));
        assert!(json.contains("timed out"));

        let cancelled = SetupOutcome::cancelled(None);
        let json = serde_json::to_string(&cancelled).unwrap();
        assert!(!json.contains("gym_id"));
    }
}
