//! Trail Orchestrator - owns the progression loop for one session.
//!
//! ```text
//! Idle ──continue──▶ Fetching ──items──▶ AwaitingOutcomeAck ──ack──┐
//!  ▲                   │ │                                         ▼
//!  └──────────────── Dispatched ◀──────── no items ──────────────── ┘
//!                      │ └──no task──▶ Complete
//!                      └──error──▶ Failed
//! ```
//!
//! State lives behind a `std::sync::Mutex` that is only held between awaits.
//! Events produced under the lock are collected and published once it is
//! released, so subscribers never observe a half-applied transition.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use trailhunt_domain::{Inventory, Marker, Outcome, Position, SessionContext, SessionKey, Task};

use crate::application::error::TrailError;
use crate::application::markers::MarkerBoard;
use crate::application::navigation::QueryParams;
use crate::application::proximity::{
    MarkerChange, PositionReading, ProximityConfig, ProximityEngine, ProximityUpdate,
};
use crate::application::router::{route, TaskScreen};
use crate::infrastructure::messaging::EventBus;
use crate::ports::outbound::{ChatReply, GatewayError, NextStep, TrailEvent, TrailGatewayPort};

#[derive(Debug, Clone, PartialEq)]
pub enum TrailPhase {
    /// Waiting for the player to continue
    Idle,
    /// A `fetch_next` call is in flight
    Fetching,
    /// A rewarded outcome is on screen and must be dismissed first
    AwaitingOutcomeAck,
    /// A task screen is being handed control
    Dispatched,
    /// The backend has no further task for this session
    Complete,
    /// The last step failed; an explicit continue re-attempts it
    Failed(TrailError),
}

/// The task currently handed to a screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveStep {
    pub task: Task,
    pub screen: TaskScreen,
    /// Outcome that accompanied the task, if it had anything to show
    pub outcome: Option<Outcome>,
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContinueResult {
    /// A fetch is already in flight, a reward awaits acknowledgement, or the
    /// trail is complete
    Ignored,
    AwaitingAck(Outcome),
    Dispatched(ActiveStep),
    Complete,
    /// The session was reset or abandoned while the fetch was in flight
    Stale,
}

#[derive(Debug, Clone)]
struct PendingStep {
    task: Task,
    screen: TaskScreen,
    outcome: Outcome,
}

#[derive(Debug)]
struct OrchestratorState {
    phase: TrailPhase,
    generation: u64,
    session: Option<SessionKey>,
    pending: Option<PendingStep>,
    active: Option<ActiveStep>,
    task_sequence: u64,
    inventory: Inventory,
    energy: Option<i64>,
    proximity: ProximityEngine,
    markers: MarkerBoard,
}

impl OrchestratorState {
    fn new(proximity: ProximityConfig) -> Self {
        Self {
            phase: TrailPhase::Idle,
            generation: 0,
            session: None,
            pending: None,
            active: None,
            task_sequence: 0,
            inventory: Inventory::new(),
            energy: None,
            proximity: ProximityEngine::new(proximity),
            markers: MarkerBoard::new(),
        }
    }

    /// Drop the progression state and invalidate in-flight calls.
    ///
    /// Inventory and energy survive a reset for the same session key.
    fn reset(&mut self, session: Option<SessionKey>) -> Vec<TrailEvent> {
        let mut events = Vec::new();
        let change = self.proximity.set_target(None);
        push_marker_change(change, &mut events);

        if session.is_none() || session != self.session {
            self.inventory = Inventory::new();
            self.energy = None;
        }
        self.generation += 1;
        self.session = session;
        self.pending = None;
        self.active = None;
        self.task_sequence = 0;
        self.markers.clear();
        self.set_phase(TrailPhase::Idle, &mut events);
        events
    }

    fn set_phase(&mut self, phase: TrailPhase, events: &mut Vec<TrailEvent>) {
        self.phase = phase.clone();
        events.push(TrailEvent::PhaseChanged { phase });
    }

    fn dispatch(
        &mut self,
        task: Task,
        screen: TaskScreen,
        outcome: Option<Outcome>,
        events: &mut Vec<TrailEvent>,
    ) -> ActiveStep {
        self.task_sequence += 1;
        self.pending = None;
        let change = if screen.uses_proximity() {
            self.proximity.track_task(&task)
        } else {
            self.proximity.set_target(None)
        };
        push_marker_change(change, events);
        if let Task::Map(map) = &task {
            self.markers.replace(map.markers.clone());
        }

        let step = ActiveStep {
            task,
            screen,
            outcome,
            sequence: self.task_sequence,
        };
        self.active = Some(step.clone());

        self.set_phase(TrailPhase::Dispatched, events);
        events.push(TrailEvent::TaskDispatched {
            screen,
            sequence: step.sequence,
        });
        self.set_phase(TrailPhase::Idle, events);
        step
    }
}

fn push_marker_change(change: MarkerChange, events: &mut Vec<TrailEvent>) {
    if !change.is_noop() {
        events.push(TrailEvent::TargetMarkerChanged {
            removed: change.removed,
            added: change.added,
        });
    }
}

pub struct TrailOrchestrator {
    gateway: Arc<dyn TrailGatewayPort>,
    events: EventBus,
    state: Mutex<OrchestratorState>,
    debug: AtomicBool,
}

impl TrailOrchestrator {
    pub fn new(
        gateway: Arc<dyn TrailGatewayPort>,
        events: EventBus,
        proximity: ProximityConfig,
    ) -> Self {
        Self {
            gateway,
            events,
            state: Mutex::new(OrchestratorState::new(proximity)),
            debug: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, OrchestratorState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn set_debug(&self, debug: bool) {
        self.debug.store(debug, Ordering::Relaxed);
    }

    pub fn debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    pub fn phase(&self) -> TrailPhase {
        self.lock().phase.clone()
    }

    pub fn active_step(&self) -> Option<ActiveStep> {
        self.lock().active.clone()
    }

    /// Outcome currently waiting for `acknowledge_outcome`.
    pub fn pending_outcome(&self) -> Option<Outcome> {
        self.lock().pending.as_ref().map(|p| p.outcome.clone())
    }

    pub fn inventory(&self) -> Inventory {
        self.lock().inventory.clone()
    }

    pub fn energy(&self) -> Option<i64> {
        self.lock().energy
    }

    pub fn task_sequence(&self) -> u64 {
        self.lock().task_sequence
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.lock().markers.markers().to_vec()
    }

    pub fn marker_generation(&self) -> u64 {
        self.lock().markers.generation()
    }

    /// Ask the backend for the next step.
    ///
    /// Only an explicit player action calls this. Calls arriving while a
    /// fetch is in flight, while a reward awaits acknowledgement, or after the
    /// trail completed are ignored.
    pub async fn continue_trail(
        &self,
        session: SessionContext,
    ) -> Result<ContinueResult, TrailError> {
        let key = session.session_key();
        let mut events = Vec::new();

        let generation = {
            let mut state = self.lock();
            if state.session.as_ref().is_some_and(|current| *current != key) {
                tracing::info!(session = %key, "Session changed, resetting trail state");
                events.extend(state.reset(Some(key.clone())));
            }
            state.session = Some(key.clone());

            let busy = matches!(
                state.phase,
                TrailPhase::Fetching | TrailPhase::AwaitingOutcomeAck | TrailPhase::Complete
            );
            if busy {
                tracing::debug!(session = %key, phase = ?state.phase, "Continue ignored");
                None
            } else {
                state.set_phase(TrailPhase::Fetching, &mut events);
                Some(state.generation)
            }
        };
        self.events.dispatch_all(events).await;
        let Some(generation) = generation else {
            return Ok(ContinueResult::Ignored);
        };

        tracing::debug!(
            user_id = %session.user_id(),
            trail_ref = %session.trail_ref(),
            path = %session.path(),
            "Fetching next task"
        );
        let result = self.gateway.fetch_next(&session, self.debug()).await;

        let mut events = Vec::new();
        let outcome = {
            let mut state = self.lock();
            if state.generation != generation {
                tracing::debug!(session = %key, "Discarding response for abandoned session");
                return Ok(ContinueResult::Stale);
            }
            Self::apply_next(&mut state, result, &mut events)
        };
        self.events.dispatch_all(events).await;
        outcome
    }

    fn apply_next(
        state: &mut OrchestratorState,
        result: Result<NextStep, GatewayError>,
        events: &mut Vec<TrailEvent>,
    ) -> Result<ContinueResult, TrailError> {
        let step = match result {
            Ok(step) => step,
            Err(err) => {
                let err = TrailError::from(err);
                tracing::warn!(error = %err, retryable = err.is_retryable(), "Trail step failed");
                state.set_phase(TrailPhase::Failed(err.clone()), events);
                events.push(TrailEvent::StepFailed {
                    message: err.to_string(),
                    retryable: err.is_retryable(),
                });
                return Err(err);
            }
        };

        let outcome = step.outcome.filter(Outcome::is_visible);

        let Some(task) = step.task else {
            if let Some(outcome) = outcome {
                state.inventory.extend(outcome.items.iter().cloned());
                events.push(TrailEvent::RewardPresented { outcome });
            }
            state.pending = None;
            let change = state.proximity.set_target(None);
            push_marker_change(change, events);
            state.set_phase(TrailPhase::Complete, events);
            events.push(TrailEvent::TrailCompleted);
            tracing::info!(session = ?state.session, "Trail complete");
            return Ok(ContinueResult::Complete);
        };

        let (screen, _) = route(&task);

        match outcome {
            Some(outcome) if outcome.requires_ack() => {
                state.inventory.extend(outcome.items.iter().cloned());
                state.pending = Some(PendingStep {
                    task,
                    screen,
                    outcome: outcome.clone(),
                });
                state.set_phase(TrailPhase::AwaitingOutcomeAck, events);
                events.push(TrailEvent::RewardPresented {
                    outcome: outcome.clone(),
                });
                tracing::debug!(items = outcome.items.len(), "Reward awaiting acknowledgement");
                Ok(ContinueResult::AwaitingAck(outcome))
            }
            outcome => {
                let step = state.dispatch(task, screen, outcome, events);
                tracing::debug!(screen = screen.name(), sequence = step.sequence, "Task dispatched");
                Ok(ContinueResult::Dispatched(step))
            }
        }
    }

    /// Dismiss the reward on screen and hand control to the waiting task.
    pub async fn acknowledge_outcome(&self) -> Result<ActiveStep, TrailError> {
        let mut events = Vec::new();
        let step = {
            let mut state = self.lock();
            if state.phase != TrailPhase::AwaitingOutcomeAck {
                return Err(TrailError::NothingToAcknowledge);
            }
            let pending = state.pending.take().ok_or(TrailError::NothingToAcknowledge)?;
            state.dispatch(pending.task, pending.screen, Some(pending.outcome), &mut events)
        };
        tracing::debug!(screen = step.screen.name(), sequence = step.sequence, "Reward acknowledged");
        self.events.dispatch_all(events).await;
        Ok(step)
    }

    /// Re-attempt a failed step. Does nothing unless the last step failed.
    pub async fn retry(&self, session: SessionContext) -> Result<ContinueResult, TrailError> {
        if !matches!(self.phase(), TrailPhase::Failed(_)) {
            return Ok(ContinueResult::Ignored);
        }
        self.continue_trail(session).await
    }

    /// Leave the current session. Responses still in flight become no-ops.
    pub async fn abandon(&self) {
        let events = self.lock().reset(None);
        tracing::info!("Trail abandoned");
        self.events.dispatch_all(events).await;
    }

    /// Start over for `session`, clearing a completed or failed trail.
    pub async fn reset_session(&self, session: &SessionContext) {
        let key = session.session_key();
        let events = self.lock().reset(Some(key.clone()));
        tracing::info!(session = %key, "Trail session reset");
        self.events.dispatch_all(events).await;
    }

    /// Rebuild the active step from navigation parameters without a fetch.
    pub async fn resume(&self, params: &QueryParams) -> Result<Option<ActiveStep>, TrailError> {
        let session = params.session()?;
        let mut events = Vec::new();
        let step = {
            let mut state = self.lock();
            events.extend(state.reset(Some(session.session_key())));
            params.task.clone().map(|task| {
                let (screen, _) = route(&task);
                state.task_sequence = params.task_sequence.unwrap_or(1).saturating_sub(1);
                state.dispatch(task, screen, None, &mut events)
            })
        };
        tracing::info!(
            session = %session.session_key(),
            resumed = step.is_some(),
            "Trail resumed from query"
        );
        self.events.dispatch_all(events).await;
        Ok(step)
    }

    /// Navigation parameters describing `session` and the active task.
    pub fn query_params(&self, session: &SessionContext) -> QueryParams {
        let params = QueryParams::from_session(session);
        match self.active_step() {
            Some(step) => params.with_task(step.task, step.sequence),
            None => params,
        }
    }

    /// Feed a location reading into the proximity engine.
    pub async fn update_position(&self, reading: PositionReading) -> ProximityUpdate {
        let mut events = Vec::new();
        let update = {
            let mut state = self.lock();
            let update = state.proximity.update_player(reading);
            if update.found {
                if let (Some(marker), Some(distance_m)) =
                    (state.proximity.marker(), update.status.distance_m())
                {
                    events.push(TrailEvent::TargetFound {
                        target: marker.position,
                        distance_m,
                    });
                }
            }
            update
        };
        self.events.dispatch_all(events).await;
        update
    }

    /// Distance from the player to the active target.
    pub fn distance_to_target(&self) -> Result<f64, TrailError> {
        Ok(self.lock().proximity.distance_to_target()?)
    }

    /// Point the proximity engine at a new target, or clear it.
    pub async fn set_target(&self, target: Option<Position>) -> MarkerChange {
        let change = self.lock().proximity.set_target(target);
        let mut events = Vec::new();
        push_marker_change(change, &mut events);
        self.events.dispatch_all(events).await;
        change
    }

    /// Re-fetch the map markers and replace the board.
    pub async fn refresh_markers(&self, session: &SessionContext) -> Result<Vec<Marker>, TrailError> {
        let generation = self.lock().generation;
        let markers = self.gateway.fetch_markers(session).await?;

        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!("Discarding markers for abandoned session");
            return Ok(markers);
        }
        state.markers.replace(markers.clone());
        Ok(markers)
    }

    /// Send a chat message to the active character.
    ///
    /// Items in the reply join the inventory. A chat failure leaves the trail
    /// phase untouched.
    pub async fn send_chat_message(
        &self,
        session: &SessionContext,
        message: &str,
    ) -> Result<ChatReply, TrailError> {
        let generation = self.lock().generation;
        let reply = self.gateway.post_chat_message(session, message).await?;

        let mut events = Vec::new();
        {
            let mut state = self.lock();
            if state.generation != generation {
                tracing::debug!("Discarding chat reply for abandoned session");
                return Ok(reply);
            }
            state.inventory.extend(reply.items.iter().cloned());
            if reply.energy.is_some() {
                state.energy = reply.energy;
            }
            events.push(TrailEvent::ChatReplied {
                message: reply.message.clone(),
                energy: reply.energy,
            });
        }
        self.events.dispatch_all(events).await;
        Ok(reply)
    }
}
