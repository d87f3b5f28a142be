//! Proximity Engine - decides when the player has reached a map target.
//!
//! Player fixes arrive in receipt order and the last one wins. The "found"
//! signal is edge-triggered: it fires the first time the player is inside the
//! threshold for the current target and stays quiet until the target changes.

use thiserror::Error;
use trailhunt_domain::{Position, Task};
use uuid::Uuid;

/// Default proximity threshold in metres.
pub const DEFAULT_PROXIMITY_THRESHOLD_M: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityConfig {
    /// Maximum distance at which a target counts as reached
    pub threshold_m: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            threshold_m: DEFAULT_PROXIMITY_THRESHOLD_M,
        }
    }
}

/// One callback from the location sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionReading {
    Fix(Position),
    PermissionDenied,
    SignalLost,
}

/// Why no position is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPositionReason {
    /// No reading has arrived yet
    AwaitingFix,
    PermissionDenied,
    SignalLost,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProximityStatus {
    /// No map target is active
    NoTarget,
    /// Target is active but the player position is unknown
    NoPosition(NoPositionReason),
    Outside { distance_m: f64 },
    Inside { distance_m: f64 },
}

impl ProximityStatus {
    pub fn distance_m(&self) -> Option<f64> {
        match self {
            ProximityStatus::Outside { distance_m } | ProximityStatus::Inside { distance_m } => {
                Some(*distance_m)
            }
            _ => None,
        }
    }
}

/// Result of feeding one reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityUpdate {
    pub status: ProximityStatus,
    /// True exactly once per target, on the reading that first lands inside
    pub found: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProximityError {
    #[error("player position unavailable")]
    NoPosition,
    #[error("no active target")]
    NoTarget,
}

/// The pin drawn for the current target.
///
/// A fresh handle is minted every time the target moves; handles are never
/// reused across positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerHandle {
    pub id: Uuid,
    pub position: Position,
}

/// Marker operations the map layer must apply, removal first.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarkerChange {
    pub removed: Option<MarkerHandle>,
    pub added: Option<MarkerHandle>,
}

impl MarkerChange {
    pub fn is_noop(&self) -> bool {
        self.removed.is_none() && self.added.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PlayerFix {
    Known(Position),
    Unavailable(NoPositionReason),
}

#[derive(Debug, Clone)]
pub struct ProximityEngine {
    config: ProximityConfig,
    player: PlayerFix,
    target: Option<MarkerHandle>,
    fired: bool,
}

impl ProximityEngine {
    pub fn new(config: ProximityConfig) -> Self {
        Self {
            config,
            player: PlayerFix::Unavailable(NoPositionReason::AwaitingFix),
            target: None,
            fired: false,
        }
    }

    /// Set or clear the active target.
    ///
    /// A different position replaces the marker wholesale and re-arms the
    /// found signal. Setting the same position again changes nothing.
    pub fn set_target(&mut self, target: Option<Position>) -> MarkerChange {
        let current = self.target.map(|handle| handle.position);
        if current == target {
            return MarkerChange::default();
        }
        self.replace_target(target)
    }

    /// Activate the target of a freshly dispatched task.
    ///
    /// Every activation is a new target, even at the position of the previous
    /// one, so the marker is reissued and the found signal re-armed.
    pub fn track_task(&mut self, task: &Task) -> MarkerChange {
        let target = task.proximity_target();
        if target.is_none() && self.target.is_none() {
            return MarkerChange::default();
        }
        self.replace_target(target)
    }

    fn replace_target(&mut self, target: Option<Position>) -> MarkerChange {
        let removed = self.target.take();
        let added = target.map(|position| MarkerHandle {
            id: Uuid::new_v4(),
            position,
        });
        self.target = added;
        self.fired = false;

        tracing::debug!(
            removed = ?removed.map(|m| m.id),
            added = ?added.map(|m| m.id),
            "Proximity target replaced"
        );

        MarkerChange { removed, added }
    }

    /// Feed one sensor reading.
    pub fn update_player(&mut self, reading: PositionReading) -> ProximityUpdate {
        self.player = match reading {
            PositionReading::Fix(position) => PlayerFix::Known(position),
            PositionReading::PermissionDenied => {
                PlayerFix::Unavailable(NoPositionReason::PermissionDenied)
            }
            PositionReading::SignalLost => PlayerFix::Unavailable(NoPositionReason::SignalLost),
        };

        let status = self.status();
        let found = matches!(status, ProximityStatus::Inside { .. }) && !self.fired;
        if found {
            self.fired = true;
            tracing::info!(distance_m = ?status.distance_m(), "Target found");
        }

        ProximityUpdate { status, found }
    }

    pub fn status(&self) -> ProximityStatus {
        let Some(target) = self.target else {
            return ProximityStatus::NoTarget;
        };
        match self.player {
            PlayerFix::Unavailable(reason) => ProximityStatus::NoPosition(reason),
            PlayerFix::Known(player) => {
                let distance_m = player.distance_to(&target.position);
                if distance_m <= self.config.threshold_m {
                    ProximityStatus::Inside { distance_m }
                } else {
                    ProximityStatus::Outside { distance_m }
                }
            }
        }
    }

    pub fn distance_to_target(&self) -> Result<f64, ProximityError> {
        match self.status() {
            ProximityStatus::NoTarget => Err(ProximityError::NoTarget),
            ProximityStatus::NoPosition(_) => Err(ProximityError::NoPosition),
            ProximityStatus::Outside { distance_m } | ProximityStatus::Inside { distance_m } => {
                Ok(distance_m)
            }
        }
    }

    pub fn marker(&self) -> Option<MarkerHandle> {
        self.target
    }
}

impl Default for ProximityEngine {
    fn default() -> Self {
        Self::new(ProximityConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Position {
        Position::new(51.4545, -2.5879).unwrap()
    }

    fn at_distance(metres: f64) -> PositionReading {
        PositionReading::Fix(target().offset_m(metres, 0.0))
    }

    fn armed_engine() -> ProximityEngine {
        let mut engine = ProximityEngine::new(ProximityConfig { threshold_m: 50.0 });
        engine.set_target(Some(target()));
        engine
    }

    #[test]
    fn test_single_found_event_on_crossing() {
        let mut engine = armed_engine();
        let fired: Vec<bool> = [120.0, 80.0, 40.0, 5.0]
            .into_iter()
            .map(|d| engine.update_player(at_distance(d)).found)
            .collect();
        assert_eq!(fired, [false, false, true, false]);
    }

    #[test]
    fn test_no_refire_while_inside_or_after_reentry() {
        let mut engine = armed_engine();
        let fired: Vec<bool> = [120.0, 80.0, 40.0, 40.0, 5.0, 90.0, 10.0]
            .into_iter()
            .map(|d| engine.update_player(at_distance(d)).found)
            .collect();
        assert_eq!(fired.iter().filter(|f| **f).count(), 1);
        assert!(fired[2]);
    }

    #[test]
    fn test_target_change_rearms_and_replaces_marker() {
        let mut engine = armed_engine();
        let first_marker = engine.marker().unwrap();
        assert!(engine.update_player(at_distance(10.0)).found);

        let next_target = target().offset_m(500.0, 0.0);
        let change = engine.set_target(Some(next_target));
        assert_eq!(change.removed, Some(first_marker));
        let added = change.added.unwrap();
        assert_ne!(added.id, first_marker.id);
        assert_eq!(added.position, next_target);

        let update = engine.update_player(PositionReading::Fix(next_target.offset_m(20.0, 0.0)));
        assert!(update.found);
    }

    #[test]
    fn test_same_target_is_noop_and_does_not_rearm() {
        let mut engine = armed_engine();
        assert!(engine.update_player(at_distance(10.0)).found);
        let change = engine.set_target(Some(target()));
        assert!(change.is_noop());
        assert!(!engine.update_player(at_distance(5.0)).found);
    }

    #[test]
    fn test_new_task_at_same_position_rearms() {
        let mut engine = ProximityEngine::default();
        let task = Task::Marker(trailhunt_domain::MarkerTask {
            common: Default::default(),
            lat: target().lat,
            lng: target().lng,
            title: None,
        });

        let first = engine.track_task(&task).added.unwrap();
        assert!(engine.update_player(at_distance(5.0)).found);

        let change = engine.track_task(&task);
        assert_eq!(change.removed, Some(first));
        let second = change.added.unwrap();
        assert_ne!(second.id, first.id);
        assert_eq!(second.position, first.position);
        assert!(engine.update_player(at_distance(5.0)).found);
    }

    #[test]
    fn test_task_without_target_after_none_is_noop() {
        let mut engine = ProximityEngine::default();
        let task = Task::Information(Default::default());
        assert!(engine.track_task(&task).is_noop());
    }

    #[test]
    fn test_clearing_target() {
        let mut engine = armed_engine();
        let marker = engine.marker().unwrap();
        let change = engine.set_target(None);
        assert_eq!(change.removed, Some(marker));
        assert_eq!(change.added, None);

        let update = engine.update_player(at_distance(0.0));
        assert_eq!(update.status, ProximityStatus::NoTarget);
        assert!(!update.found);
        assert_eq!(engine.distance_to_target(), Err(ProximityError::NoTarget));
    }

    #[test]
    fn test_denied_permission_is_no_position_not_outside() {
        let mut engine = armed_engine();
        let update = engine.update_player(PositionReading::PermissionDenied);
        assert_eq!(
            update.status,
            ProximityStatus::NoPosition(NoPositionReason::PermissionDenied)
        );
        assert!(!update.found);
        assert_eq!(engine.distance_to_target(), Err(ProximityError::NoPosition));
    }

    #[test]
    fn test_awaiting_first_fix() {
        let engine = armed_engine();
        assert_eq!(
            engine.status(),
            ProximityStatus::NoPosition(NoPositionReason::AwaitingFix)
        );
    }

    #[test]
    fn test_signal_recovers_with_last_value_winning() {
        let mut engine = armed_engine();
        engine.update_player(at_distance(200.0));
        engine.update_player(PositionReading::SignalLost);
        let update = engine.update_player(at_distance(30.0));
        assert!(update.found);
        let distance = engine.distance_to_target().unwrap();
        assert!((distance - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let mut engine = ProximityEngine::new(ProximityConfig { threshold_m: 10.0 });
        engine.set_target(Some(target()));
        assert!(!engine.update_player(at_distance(40.0)).found);
        assert!(engine.update_player(at_distance(9.0)).found);
    }

    #[test]
    fn test_track_task_uses_task_target() {
        let mut engine = ProximityEngine::default();
        let task: Task = serde_json::from_value(serde_json::json!({
            "type": "Marker", "lat": 51.4545, "lng": -2.5879
        }))
        .unwrap();
        let change = engine.track_task(&task);
        assert_eq!(change.added.map(|m| m.position), Some(target()));

        let info = Task::Information(Default::default());
        let change = engine.track_task(&info);
        assert!(change.removed.is_some());
        assert_eq!(engine.status(), ProximityStatus::NoTarget);
    }
}
