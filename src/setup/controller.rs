// ABOUTME: Async controller driving the setup wizard against real services
// ABOUTME: Owns the in-progress gym id, the cancellation flag, and the spawned background work
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::constants::defaults::DEFAULT_EQUIPMENT;
use crate::context::OrchestratorContext;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{Equipment, EquipmentItem, ExercisePoolEntry, PlanTree, ProfileUpdate, SetupOutcome};
use crate::services::plan_generation::GenerationOutcome;
use crate::services::reaper::ReapScope;
use crate::services::{gyms, mirror, plan_generation, profiles, reaper};
use crate::setup::background::BackgroundTasks;
use crate::setup::machine::{self, Effect, SetupEvent, SetupOption, SetupStep};

/// Requests cooperative cancellation of a setup flow from another task.
///
/// The flow acts on the flag at its next opportunity: a blocking plan call
/// already in flight runs to completion, its result is discarded on
/// arrival, and the in-progress gym is cleaned up.
#[derive(Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Flag the flow as cancelled.
    pub fn request(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// The async half of the setup wizard.
///
/// Drives the pure [`machine`] step by step: each driver method asks the
/// machine whether the event is legal, executes the returned effects
/// against the injected store, cache, and plan provider, and only then
/// commits the step change. Background reap and mirror work goes through
/// [`BackgroundTasks`] so failures stay observable.
pub struct SetupFlow {
    context: OrchestratorContext,
    owner_id: Uuid,
    step: SetupStep,
    // Shared with spawned reap passes: the soft lock that protects the
    // just-created gym from a concurrent background sweep.
    in_progress: Arc<RwLock<Option<Uuid>>>,
    cancelled: Arc<AtomicBool>,
    outcome: Option<SetupOutcome>,
    refresh_tx: watch::Sender<u64>,
    tasks: BackgroundTasks,
}

impl SetupFlow {
    /// Create an idle flow for `owner_id`.
    #[must_use]
    pub fn new(context: OrchestratorContext, owner_id: Uuid) -> Self {
        let (refresh_tx, _) = watch::channel(0);
        Self {
            context,
            owner_id,
            step: SetupStep::Idle,
            in_progress: Arc::new(RwLock::new(None)),
            cancelled: Arc::new(AtomicBool::new(false)),
            outcome: None,
            refresh_tx,
            tasks: BackgroundTasks::new(),
        }
    }

    /// Current wizard step.
    #[must_use]
    pub const fn step(&self) -> SetupStep {
        self.step
    }

    /// Owner this flow belongs to.
    #[must_use]
    pub const fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    /// Id of the gym currently being set up, if one has been created.
    pub async fn in_progress_gym(&self) -> Option<Uuid> {
        *self.in_progress.read().await
    }

    /// Outcome of the most recent terminal event (summary, abort, cancel).
    #[must_use]
    pub const fn last_outcome(&self) -> Option<&SetupOutcome> {
        self.outcome.as_ref()
    }

    /// Handle for requesting cancellation from another task.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Subscribe to the refresh signal bumped whenever the gym list
    /// changed behind the UI's back (finalization, cancellation, abort).
    #[must_use]
    pub fn refresh_signal(&self) -> watch::Receiver<u64> {
        self.refresh_tx.subscribe()
    }

    /// Wait for all spawned background work and return how many of those
    /// tasks failed. Tests use this to make reap and mirror deterministic.
    pub async fn wait_for_background_tasks(&mut self) -> usize {
        self.tasks.wait_idle().await
    }

    /// Opens the wizard: `Idle → Naming`, plus a non-blocking reap of
    /// stale incomplete gyms left behind by earlier sessions.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when a setup is already in progress.
    pub async fn start_add_gym(&mut self) -> AppResult<()> {
        let transition = machine::transition(self.step, SetupEvent::StartAddGym)?;
        self.cancelled.store(false, Ordering::SeqCst);
        self.outcome = None;
        self.tasks.drain_errors();

        for effect in &transition.effects {
            if *effect == Effect::SpawnBackgroundReap {
                self.spawn_background_reap();
            }
        }
        self.step = transition.next;
        debug!(user_id = %self.owner_id, "Setup wizard opened");
        Ok(())
    }

    /// Names the gym: validates, creates the row, records it in-progress.
    ///
    /// # Errors
    ///
    /// Validation failures (`InvalidInput`, `GymCapReached`) keep the
    /// wizard open at `Naming` with no side effects; a remote write
    /// failure aborts the wizard back to `Idle`.
    pub async fn submit_name(&mut self, name: &str) -> AppResult<Uuid> {
        let transition = machine::transition(self.step, SetupEvent::SubmitName)?;

        // Hold the soft lock across the remote create: the background reap
        // pass reads it before selecting victims, so a gym must never exist
        // remotely while the lock still reads `None`.
        let mut in_progress = self.in_progress.write().await;
        let gym = match gyms::create_gym(self.context.store().as_ref(), self.owner_id, name).await
        {
            Ok(gym) => gym,
            Err(err) if is_validation_error(&err) => {
                // Inline message; the user can correct and resubmit.
                return Err(err);
            }
            Err(err) => {
                // Nothing was created; abort straight to idle.
                self.step = SetupStep::Idle;
                self.outcome = Some(SetupOutcome::error(None, err.message.clone()));
                warn!(user_id = %self.owner_id, error = %err, "Gym creation failed, setup aborted");
                return Err(err);
            }
        };

        *in_progress = Some(gym.id);
        drop(in_progress);
        self.step = transition.next;
        info!(user_id = %self.owner_id, gym_id = %gym.id, "Setup gym created");
        Ok(gym.id)
    }

    /// Picks the equipment source. `ApplyDefaults` installs the default
    /// loadout and finalizes; `Empty` finalizes immediately (the gym stays
    /// incomplete and remains subject to future reap passes); the other
    /// options move to their sub-step and wait for more input.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` outside `ConfiguringOptions`; a store
    /// failure while installing defaults aborts the wizard with cleanup.
    pub async fn choose_option(&mut self, option: SetupOption) -> AppResult<()> {
        let transition = machine::transition(self.step, SetupEvent::ChooseOption(option))?;
        let gym_id = self.require_in_progress().await?;

        for effect in &transition.effects {
            if *effect == Effect::InsertDefaultEquipment {
                if let Err(err) = self.insert_default_equipment(gym_id).await {
                    return Err(self.abort_with_cleanup(err).await);
                }
            }
        }
        self.step = transition.next;
        debug!(user_id = %self.owner_id, gym_id = %gym_id, step = %self.step, "Equipment source chosen");

        // Defaults and empty need no further input; seal the run here.
        if matches!(self.step, SetupStep::ApplyingDefaults | SetupStep::Empty) {
            let sealed = machine::transition(self.step, SetupEvent::ConfigurationApplied)?;
            let outcome = if option == SetupOption::ApplyDefaults {
                SetupOutcome::success(gym_id).with_message(format!(
                    "installed {} default equipment types",
                    DEFAULT_EQUIPMENT.len()
                ))
            } else {
                SetupOutcome::success(gym_id).with_message("created without equipment")
            };
            self.outcome = Some(outcome);
            self.step = sealed.next;
        }
        Ok(())
    }

    /// Accepts the AI-identified equipment list and persists it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` outside `AiUpload`; a store failure aborts
    /// the wizard with cleanup.
    pub async fn confirm_equipment(&mut self, items: &[EquipmentItem]) -> AppResult<()> {
        let transition = machine::transition(self.step, SetupEvent::ConfirmEquipment)?;
        let gym_id = self.require_in_progress().await?;

        for effect in &transition.effects {
            if *effect == Effect::PersistEquipment {
                let rows: Vec<Equipment> = items.iter().map(|item| item.for_gym(gym_id)).collect();
                if !rows.is_empty() {
                    if let Err(err) = self.context.store().insert_equipment(&rows).await {
                        return Err(self.abort_with_cleanup(AppError::from(err)).await);
                    }
                }
            }
        }
        self.step = transition.next;
        debug!(user_id = %self.owner_id, gym_id = %gym_id, items = items.len(), "Equipment confirmed");
        Ok(())
    }

    /// Persists the selected exercise pool and routes onward: straight to
    /// plan generation when the profile already has the program
    /// preferences, otherwise to profile collection.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` outside `SelectingExercises`; a store
    /// failure aborts the wizard with cleanup.
    pub async fn confirm_exercises(&mut self, selected: &[Uuid]) -> AppResult<()> {
        // Legality probe before any IO; the real event depends on the profile.
        machine::transition(
            self.step,
            SetupEvent::ConfirmExercises {
                profile_ready: false,
            },
        )?;
        let gym_id = self.require_in_progress().await?;

        let profile =
            match profiles::get_or_create(self.context.store().as_ref(), self.owner_id).await {
                Ok(profile) => profile,
                Err(err) => return Err(self.abort_with_cleanup(err).await),
            };
        let profile_ready = profile.has_generation_prerequisites();

        let transition =
            machine::transition(self.step, SetupEvent::ConfirmExercises { profile_ready })?;
        for effect in &transition.effects {
            if *effect == Effect::PersistExercisePool {
                let rows: Vec<ExercisePoolEntry> = selected
                    .iter()
                    .map(|exercise_id| ExercisePoolEntry {
                        gym_id,
                        exercise_id: *exercise_id,
                    })
                    .collect();
                if !rows.is_empty() {
                    if let Err(err) = self
                        .context
                        .store()
                        .insert_exercise_pool_entries(&rows)
                        .await
                    {
                        return Err(self.abort_with_cleanup(AppError::from(err)).await);
                    }
                }
            }
        }
        self.step = transition.next;
        debug!(
            user_id = %self.owner_id,
            gym_id = %gym_id,
            selected = selected.len(),
            profile_ready,
            "Exercise pool confirmed"
        );
        Ok(())
    }

    /// Persists the collected program preferences and moves to plan
    /// generation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` outside `CollectingProfile`; a store failure
    /// aborts the wizard with cleanup.
    pub async fn complete_profile(&mut self, update: &ProfileUpdate) -> AppResult<()> {
        let transition = machine::transition(self.step, SetupEvent::CompleteProfile)?;

        for effect in &transition.effects {
            if *effect == Effect::PersistProfile {
                if let Err(err) =
                    profiles::update_fields(self.context.store().as_ref(), self.owner_id, update)
                        .await
                {
                    return Err(self.abort_with_cleanup(err).await);
                }
            }
        }
        self.step = transition.next;
        Ok(())
    }

    /// Runs the blocking plan-generation call and settles its outcome:
    /// success spawns the local mirror pass, a timeout or service failure
    /// finalizes with generation deferred, and a cancellation requested
    /// while the call was in flight discards the result and cleans up.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` outside `GeneratingPlan`,
    /// `PrerequisiteMissing` when the profile turns out incomplete (the
    /// wizard moves back to profile collection), or the store error that
    /// aborted the wizard.
    pub async fn generate_plan(&mut self) -> AppResult<SetupOutcome> {
        // Legality probe before the blocking call.
        machine::transition(self.step, SetupEvent::GenerationFinished { mirror: false })?;
        let gym_id = self.require_in_progress().await?;

        let timeout = self.context.config().plan_service.timeout();
        let result = plan_generation::generate(
            self.context.store().as_ref(),
            self.context.plan_provider().as_ref(),
            timeout,
            self.owner_id,
            gym_id,
        )
        .await;

        if self.cancelled.load(Ordering::SeqCst) {
            info!(user_id = %self.owner_id, gym_id = %gym_id, "Discarding generation result after cancellation");
            return self.cancel().await;
        }

        let generation = match result {
            Ok(generation) => generation,
            Err(err) => return Err(self.abort_with_cleanup(err).await),
        };
        self.settle_generation(gym_id, generation)
    }

    /// Copies equipment, exercise pool, and plans from `source_gym_id`
    /// onto the in-progress gym. The equipment and pool copy is
    /// best-effort; the plan copy's "nothing to copy" answer still
    /// finalizes as success.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` outside `Copying` or when the source gym
    /// fails validation (which aborts the wizard with cleanup), or the
    /// store error that aborted the wizard.
    pub async fn copy_from_gym(&mut self, source_gym_id: Uuid) -> AppResult<SetupOutcome> {
        let transition = machine::transition(self.step, SetupEvent::CopyFromGym)?;
        let gym_id = self.require_in_progress().await?;

        let mut copy_report = None;
        for effect in &transition.effects {
            if *effect == Effect::CopySetupFromSource {
                match gyms::copy_setup(
                    self.context.store().as_ref(),
                    self.owner_id,
                    source_gym_id,
                    gym_id,
                )
                .await
                {
                    Ok(report) => copy_report = Some(report),
                    Err(err) => return Err(self.abort_with_cleanup(err).await),
                }
            }
        }
        self.step = transition.next;

        let timeout = self.context.config().plan_service.timeout();
        let result = plan_generation::copy_plans(
            self.context.store().as_ref(),
            self.context.plan_provider().as_ref(),
            timeout,
            self.owner_id,
            source_gym_id,
            gym_id,
        )
        .await;

        if self.cancelled.load(Ordering::SeqCst) {
            info!(user_id = %self.owner_id, gym_id = %gym_id, "Discarding copy result after cancellation");
            return self.cancel().await;
        }

        let generation = match result {
            Ok(generation) => generation,
            Err(err) => return Err(self.abort_with_cleanup(err).await),
        };
        let mut outcome = self.settle_generation(gym_id, generation)?;

        if let Some(report) = copy_report {
            let mut detail = format!(
                "copied {} equipment types and {} pool exercises",
                report.equipment_copied, report.pool_copied
            );
            if !report.complete {
                detail.push_str(" (some items failed to copy)");
            }
            outcome.message = Some(match outcome.message.take() {
                Some(existing) => format!("{existing}; {detail}"),
                None => detail,
            });
            self.outcome = Some(outcome.clone());
        }
        Ok(outcome)
    }

    /// Closes the wizard from any step: force-reaps the in-progress gym
    /// if one exists (and is still incomplete), clears the in-progress id,
    /// and returns to `Idle` with a cancelled outcome.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when nothing is in progress (`Idle`).
    pub async fn cancel(&mut self) -> AppResult<SetupOutcome> {
        let transition = machine::transition(self.step, SetupEvent::Cancel)?;
        self.cancelled.store(true, Ordering::SeqCst);
        let gym_id = *self.in_progress.read().await;

        for effect in &transition.effects {
            if *effect == Effect::ForceReapInProgress {
                if let Some(gym_id) = gym_id {
                    match reaper::reap(
                        self.context.store().as_ref(),
                        self.owner_id,
                        &ReapScope::forced(gym_id),
                    )
                    .await
                    {
                        Ok(deleted) => {
                            debug!(user_id = %self.owner_id, gym_id = %gym_id, deleted, "Cancellation cleanup finished");
                        }
                        Err(err) => {
                            // The next background pass retries this cleanup.
                            error!(user_id = %self.owner_id, gym_id = %gym_id, error = %err, "Cancellation cleanup failed");
                        }
                    }
                }
            }
        }

        self.step = transition.next;
        *self.in_progress.write().await = None;
        self.signal_refresh();
        let outcome = SetupOutcome::cancelled(gym_id);
        self.outcome = Some(outcome.clone());
        info!(user_id = %self.owner_id, "Setup cancelled");
        Ok(outcome)
    }

    /// Acknowledges the summary: clears the in-progress id, signals the
    /// surrounding application to refresh, and returns the run's outcome.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` outside `Summary`.
    pub async fn finish(&mut self) -> AppResult<SetupOutcome> {
        let transition = machine::transition(self.step, SetupEvent::Finish)?;
        let gym_id = self.require_in_progress().await?;
        let outcome = self
            .outcome
            .take()
            .unwrap_or_else(|| SetupOutcome::success(gym_id));

        for effect in &transition.effects {
            if *effect == Effect::SignalRefresh {
                self.signal_refresh();
            }
        }
        self.step = transition.next;
        *self.in_progress.write().await = None;
        self.tasks.drain_errors();
        info!(user_id = %self.owner_id, gym_id = %gym_id, status = ?outcome.status, "Setup finished");
        Ok(outcome)
    }

    /// Maps a generation outcome onto the machine and the run outcome.
    fn settle_generation(
        &mut self,
        gym_id: Uuid,
        generation: GenerationOutcome,
    ) -> AppResult<SetupOutcome> {
        let outcome = match generation {
            GenerationOutcome::PrerequisiteMissing(fields) => {
                // Not fatal: route back to profile collection.
                let redirect = machine::transition(self.step, SetupEvent::ProfileIncomplete)?;
                self.step = redirect.next;
                return Err(AppError::prerequisite_missing(format!(
                    "profile is missing {}",
                    fields.join(", ")
                ))
                .with_user_id(self.owner_id));
            }
            GenerationOutcome::Generated(tree) => {
                let transition =
                    machine::transition(self.step, SetupEvent::GenerationFinished { mirror: true })?;
                let workouts = tree.children.len();
                if transition.effects.contains(&Effect::SpawnMirror) {
                    self.spawn_mirror(tree);
                }
                self.step = transition.next;
                SetupOutcome::success(gym_id).with_message(format!("{workouts} workouts ready"))
            }
            GenerationOutcome::NothingToCopy => {
                let transition = machine::transition(
                    self.step,
                    SetupEvent::GenerationFinished { mirror: false },
                )?;
                self.step = transition.next;
                SetupOutcome::success(gym_id).with_message("source gym had no workouts to copy")
            }
            GenerationOutcome::Deferred(reason) => {
                let transition = machine::transition(
                    self.step,
                    SetupEvent::GenerationFinished { mirror: false },
                )?;
                self.step = transition.next;
                SetupOutcome::deferred(gym_id, reason)
            }
        };
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }

    fn spawn_background_reap(&mut self) {
        let store = Arc::clone(self.context.store());
        let owner_id = self.owner_id;
        let in_progress = Arc::clone(&self.in_progress);
        self.tasks.spawn("background-reap", async move {
            // Read the soft lock when the pass actually runs, not when it
            // was spawned: a gym created in the meantime must be protected.
            let protected = *in_progress.read().await;
            let scope =
                protected.map_or_else(ReapScope::background, ReapScope::background_protecting);
            let deleted = reaper::reap(store.as_ref(), owner_id, &scope).await?;
            if deleted > 0 {
                info!(user_id = %owner_id, deleted, "Background reap removed stale gyms");
            }
            Ok(())
        });
    }

    fn spawn_mirror(&mut self, tree: PlanTree) {
        let store = Arc::clone(self.context.store());
        let cache = Arc::clone(self.context.cache());
        let owner_id = self.owner_id;
        self.tasks.spawn("mirror-plans", async move {
            let report = mirror::mirror(store.as_ref(), cache.as_ref(), owner_id, &tree).await?;
            debug!(
                plans = report.plans_mirrored,
                exercises = report.exercises_mirrored,
                resync = report.corrective_resync,
                "Plan mirror pass finished"
            );
            Ok(())
        });
    }

    /// Installs the default loadout for the `ApplyDefaults` wizard option.
    async fn insert_default_equipment(&self, gym_id: Uuid) -> AppResult<()> {
        let rows: Vec<Equipment> = DEFAULT_EQUIPMENT
            .iter()
            .copied()
            .map(|(equipment_type, quantity)| Equipment {
                gym_id,
                equipment_type: equipment_type.to_owned(),
                quantity,
            })
            .collect();
        self.context
            .store()
            .insert_equipment(&rows)
            .await
            .map_err(AppError::from)
    }

    /// Force-reaps the in-progress gym and resets to `Idle` after a
    /// mid-setup failure, then hands the original error back.
    async fn abort_with_cleanup(&mut self, err: AppError) -> AppError {
        let gym_id = *self.in_progress.read().await;
        if let Some(gym_id) = gym_id {
            if let Err(reap_err) = reaper::reap(
                self.context.store().as_ref(),
                self.owner_id,
                &ReapScope::forced(gym_id),
            )
            .await
            {
                // The next background pass retries this cleanup.
                error!(user_id = %self.owner_id, gym_id = %gym_id, error = %reap_err, "Cleanup after setup failure did not complete");
            }
        }

        self.step = SetupStep::Idle;
        *self.in_progress.write().await = None;
        self.outcome = Some(SetupOutcome::error(gym_id, err.message.clone()));
        self.signal_refresh();
        warn!(user_id = %self.owner_id, error = %err, "Setup aborted");
        err
    }

    async fn require_in_progress(&self) -> AppResult<Uuid> {
        (*self.in_progress.read().await)
            .ok_or_else(|| AppError::internal("setup flow has no in-progress gym recorded"))
    }

    fn signal_refresh(&self) {
        self.refresh_tx.send_modify(|generation| *generation += 1);
    }
}

const fn is_validation_error(err: &AppError) -> bool {
    matches!(
        err.code,
        ErrorCode::InvalidInput | ErrorCode::MissingRequiredField | ErrorCode::GymCapReached
    )
}
