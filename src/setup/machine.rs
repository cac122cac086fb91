// ABOUTME: Pure step machine for the gym setup wizard
// ABOUTME: No IO; transitions return the next step plus the effects the controller must run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Where the wizard currently is.
///
/// The four option sub-steps (`AiUpload`, `Copying`, `ApplyingDefaults`,
/// `Empty`) branch out of `ConfiguringOptions`; defaults and empty rejoin
/// at `Summary` immediately, the other two continue through the selection
/// and generation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupStep {
    /// No setup in progress
    Idle,
    /// Waiting for the gym name
    Naming,
    /// Waiting for the equipment-source choice
    ConfiguringOptions,
    /// Equipment arrives from an uploaded gym photo
    AiUpload,
    /// Equipment and plans arrive from another owned gym
    Copying,
    /// The default equipment loadout is being installed
    ApplyingDefaults,
    /// The gym is left without equipment on purpose
    Empty,
    /// Waiting for the exercise-pool selection
    SelectingExercises,
    /// Waiting for the program preferences generation requires
    CollectingProfile,
    /// The blocking plan-service call is in flight
    GeneratingPlan,
    /// Setup finished; waiting for the final acknowledgement
    Summary,
}

impl std::fmt::Display for SetupStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Naming => "naming",
            Self::ConfiguringOptions => "configuring options",
            Self::AiUpload => "ai upload",
            Self::Copying => "copying",
            Self::ApplyingDefaults => "applying defaults",
            Self::Empty => "empty",
            Self::SelectingExercises => "selecting exercises",
            Self::CollectingProfile => "collecting profile",
            Self::GeneratingPlan => "generating plan",
            Self::Summary => "summary",
        };
        f.write_str(name)
    }
}

/// Equipment-source choice offered at `ConfiguringOptions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupOption {
    /// Detect equipment from a gym photo
    AiUpload,
    /// Copy equipment, pool, and plans from another owned gym
    CopyExisting,
    /// Install the standard default loadout
    ApplyDefaults,
    /// Create the gym with no equipment
    Empty,
}

/// Everything that can drive the wizard forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupEvent {
    /// Open the wizard
    StartAddGym,
    /// The user submitted a gym name
    SubmitName,
    /// The user picked an equipment source
    ChooseOption(SetupOption),
    /// The AI-identified equipment list was accepted
    ConfirmEquipment,
    /// The exercise pool was chosen; `profile_ready` says whether the
    /// program preferences are already on file
    ConfirmExercises {
        /// Both generation-prerequisite fields are present
        profile_ready: bool,
    },
    /// The missing program preferences were collected
    CompleteProfile,
    /// The user picked the source gym on the copy path
    CopyFromGym,
    /// A no-selection option (defaults or empty) finished its work
    ConfigurationApplied,
    /// The plan-service call returned; `mirror` says whether a generated
    /// tree must be mirrored locally
    GenerationFinished {
        /// A plan tree was produced and needs mirroring
        mirror: bool,
    },
    /// The generation call found the profile incomplete after all
    ProfileIncomplete,
    /// The user closed the wizard
    Cancel,
    /// The user acknowledged the summary
    Finish,
}

/// Side effects the controller must perform when committing a transition,
/// in list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Spawn the non-blocking reap of stale incomplete gyms
    SpawnBackgroundReap,
    /// Create the gym row and record it as in-progress
    CreateGym,
    /// Persist the confirmed equipment list
    PersistEquipment,
    /// Persist the selected exercise pool
    PersistExercisePool,
    /// Persist the collected program preferences
    PersistProfile,
    /// Insert the default equipment loadout
    InsertDefaultEquipment,
    /// Copy equipment and exercise pool from the source gym
    CopySetupFromSource,
    /// Spawn the local mirror pass for the generated tree
    SpawnMirror,
    /// Force-reap the in-progress gym
    ForceReapInProgress,
    /// Tell the surrounding application to refresh its gym list
    SignalRefresh,
}

/// A committed transition: the step to move to and the effects to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Step the wizard moves to
    pub next: SetupStep,
    /// Effects the controller must execute, in order
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(next: SetupStep) -> Self {
        Self {
            next,
            effects: Vec::new(),
        }
    }

    fn with(next: SetupStep, effects: Vec<Effect>) -> Self {
        Self { next, effects }
    }
}

/// Decides whether `event` is legal in `current` and what it leads to.
///
/// Pure: no IO, no clock, no randomness. The controller executes the
/// returned effects and only then commits the step change, so a failed
/// effect never strands the wizard in a step it never really entered.
///
/// # Errors
///
/// Returns `InvalidInput` when the event is not legal in the current step.
pub fn transition(current: SetupStep, event: SetupEvent) -> AppResult<Transition> {
    use SetupStep as S;

    let transition = match (current, event) {
        (S::Idle, SetupEvent::StartAddGym) => {
            Transition::with(S::Naming, vec![Effect::SpawnBackgroundReap])
        }
        (S::Naming, SetupEvent::SubmitName) => {
            Transition::with(S::ConfiguringOptions, vec![Effect::CreateGym])
        }
        (S::ConfiguringOptions, SetupEvent::ChooseOption(option)) => match option {
            SetupOption::AiUpload => Transition::to(S::AiUpload),
            SetupOption::CopyExisting => Transition::to(S::Copying),
            SetupOption::ApplyDefaults => {
                Transition::with(S::ApplyingDefaults, vec![Effect::InsertDefaultEquipment])
            }
            SetupOption::Empty => Transition::to(S::Empty),
        },
        (S::ApplyingDefaults | S::Empty, SetupEvent::ConfigurationApplied) => {
            Transition::to(S::Summary)
        }
        (S::AiUpload, SetupEvent::ConfirmEquipment) => {
            Transition::with(S::SelectingExercises, vec![Effect::PersistEquipment])
        }
        (S::SelectingExercises, SetupEvent::ConfirmExercises { profile_ready }) => {
            let next = if profile_ready {
                S::GeneratingPlan
            } else {
                S::CollectingProfile
            };
            Transition::with(next, vec![Effect::PersistExercisePool])
        }
        (S::CollectingProfile, SetupEvent::CompleteProfile) => {
            Transition::with(S::GeneratingPlan, vec![Effect::PersistProfile])
        }
        (S::Copying, SetupEvent::CopyFromGym) => {
            Transition::with(S::GeneratingPlan, vec![Effect::CopySetupFromSource])
        }
        (S::GeneratingPlan, SetupEvent::GenerationFinished { mirror }) => {
            if mirror {
                Transition::with(S::Summary, vec![Effect::SpawnMirror])
            } else {
                Transition::to(S::Summary)
            }
        }
        (S::GeneratingPlan, SetupEvent::ProfileIncomplete) => Transition::to(S::CollectingProfile),
        (S::Summary, SetupEvent::Finish) => {
            Transition::with(S::Idle, vec![Effect::SignalRefresh])
        }
        // Cancelling before the gym row exists has nothing to clean up.
        (S::Naming, SetupEvent::Cancel) => Transition::to(S::Idle),
        (s, SetupEvent::Cancel) if s != S::Idle => {
            Transition::with(S::Idle, vec![Effect::ForceReapInProgress])
        }
        (current, event) => {
            return Err(AppError::invalid_input(format!(
                "{event:?} is not valid while the wizard is in the {current} step"
            )));
        }
    };
    Ok(transition)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next(step: SetupStep, event: SetupEvent) -> SetupStep {
        transition(step, event).unwrap().next
    }

    #[test]
    fn test_happy_path_through_ai_upload() {
        let mut step = SetupStep::Idle;
        step = next(step, SetupEvent::StartAddGym);
        assert_eq!(step, SetupStep::Naming);
        step = next(step, SetupEvent::SubmitName);
        assert_eq!(step, SetupStep::ConfiguringOptions);
        step = next(step, SetupEvent::ChooseOption(SetupOption::AiUpload));
        assert_eq!(step, SetupStep::AiUpload);
        step = next(step, SetupEvent::ConfirmEquipment);
        assert_eq!(step, SetupStep::SelectingExercises);
        step = next(
            step,
            SetupEvent::ConfirmExercises {
                profile_ready: false,
            },
        );
        assert_eq!(step, SetupStep::CollectingProfile);
        step = next(step, SetupEvent::CompleteProfile);
        assert_eq!(step, SetupStep::GeneratingPlan);
        step = next(step, SetupEvent::GenerationFinished { mirror: true });
        assert_eq!(step, SetupStep::Summary);
        step = next(step, SetupEvent::Finish);
        assert_eq!(step, SetupStep::Idle);
    }

    #[test]
    fn test_ready_profile_skips_collection() {
        let step = next(
            SetupStep::SelectingExercises,
            SetupEvent::ConfirmExercises { profile_ready: true },
        );
        assert_eq!(step, SetupStep::GeneratingPlan);
    }

    #[test]
    fn test_option_routing() {
        assert_eq!(
            next(
                SetupStep::ConfiguringOptions,
                SetupEvent::ChooseOption(SetupOption::CopyExisting)
            ),
            SetupStep::Copying
        );

        let defaults = transition(
            SetupStep::ConfiguringOptions,
            SetupEvent::ChooseOption(SetupOption::ApplyDefaults),
        )
        .unwrap();
        assert_eq!(defaults.next, SetupStep::ApplyingDefaults);
        assert_eq!(defaults.effects, vec![Effect::InsertDefaultEquipment]);

        let empty = transition(
            SetupStep::ConfiguringOptions,
            SetupEvent::ChooseOption(SetupOption::Empty),
        )
        .unwrap();
        assert_eq!(empty.next, SetupStep::Empty);
        assert!(empty.effects.is_empty());

        // Both no-selection options rejoin at the summary.
        assert_eq!(
            next(SetupStep::ApplyingDefaults, SetupEvent::ConfigurationApplied),
            SetupStep::Summary
        );
        assert_eq!(
            next(SetupStep::Empty, SetupEvent::ConfigurationApplied),
            SetupStep::Summary
        );
    }

    #[test]
    fn test_generation_finish_controls_mirror_effect() {
        let mirrored = transition(
            SetupStep::GeneratingPlan,
            SetupEvent::GenerationFinished { mirror: true },
        )
        .unwrap();
        assert_eq!(mirrored.effects, vec![Effect::SpawnMirror]);

        let deferred = transition(
            SetupStep::GeneratingPlan,
            SetupEvent::GenerationFinished { mirror: false },
        )
        .unwrap();
        assert!(deferred.effects.is_empty());
    }

    #[test]
    fn test_incomplete_profile_redirects_to_collection() {
        assert_eq!(
            next(SetupStep::GeneratingPlan, SetupEvent::ProfileIncomplete),
            SetupStep::CollectingProfile
        );
    }

    #[test]
    fn test_cancel_from_every_non_idle_step() {
        let steps = [
            SetupStep::Naming,
            SetupStep::ConfiguringOptions,
            SetupStep::AiUpload,
            SetupStep::Copying,
            SetupStep::ApplyingDefaults,
            SetupStep::Empty,
            SetupStep::SelectingExercises,
            SetupStep::CollectingProfile,
            SetupStep::GeneratingPlan,
            SetupStep::Summary,
        ];
        for step in steps {
            let t = transition(step, SetupEvent::Cancel).unwrap();
            assert_eq!(t.next, SetupStep::Idle, "cancel from {step}");
            if step == SetupStep::Naming {
                // No gym row exists yet, so there is nothing to reap.
                assert!(t.effects.is_empty());
            } else {
                assert_eq!(t.effects, vec![Effect::ForceReapInProgress]);
            }
        }
        assert!(transition(SetupStep::Idle, SetupEvent::Cancel).is_err());
    }

    #[test]
    fn test_illegal_events_are_rejected() {
        assert!(transition(SetupStep::Idle, SetupEvent::SubmitName).is_err());
        assert!(transition(SetupStep::Naming, SetupEvent::ConfirmEquipment).is_err());
        assert!(transition(
            SetupStep::Summary,
            SetupEvent::ChooseOption(SetupOption::Empty)
        )
        .is_err());
        assert!(transition(SetupStep::Empty, SetupEvent::Finish).is_err());
        assert!(
            transition(SetupStep::GeneratingPlan, SetupEvent::StartAddGym).is_err(),
            "cannot restart mid-flight"
        );
    }

    #[test]
    fn test_submit_name_demands_gym_creation() {
        let t = transition(SetupStep::Naming, SetupEvent::SubmitName).unwrap();
        assert_eq!(t.effects, vec![Effect::CreateGym]);
    }
}
