//! Trail events - what the engine tells the presentation layer
//!
//! The orchestrator publishes these on the `EventBus` after each state change.
//! Presentation code subscribes and renders; it never reaches into orchestrator
//! state directly.

use trailhunt_domain::{Outcome, Position};

use crate::application::{MarkerHandle, TaskScreen, TrailPhase};

#[derive(Debug, Clone, PartialEq)]
pub enum TrailEvent {
    /// Orchestrator moved to a new phase
    PhaseChanged { phase: TrailPhase },
    /// A rewarded outcome must be acknowledged before the next task is shown
    RewardPresented { outcome: Outcome },
    /// A task screen has been handed control
    TaskDispatched { screen: TaskScreen, sequence: u64 },
    /// The backend returned no further task
    TrailCompleted,
    /// The step failed; `retryable` tells the UI whether to offer "retry"
    StepFailed { message: String, retryable: bool },
    /// Chat character answered
    ChatReplied {
        message: String,
        energy: Option<i64>,
    },
    /// The target pin was replaced; the map removes `removed` before adding `added`
    TargetMarkerChanged {
        removed: Option<MarkerHandle>,
        added: Option<MarkerHandle>,
    },
    /// The player reached the active map target
    TargetFound { target: Position, distance_m: f64 },
}
