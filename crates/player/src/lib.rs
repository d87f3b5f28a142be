//! Trailhunt Player crate.
//!
//! This crate contains the trail task engine, its ports, and the
//! infrastructure adapters that back them on desktop.

pub mod application;
pub mod infrastructure;
pub mod ports;
pub mod state;

// Root-level alias so callers can write `trailhunt_player::outbound::...`.
pub mod outbound {
    pub use crate::ports::outbound::*;
}

pub use application::{PlayerConfig, TrailError, TrailOrchestrator};
pub use state::Platform;
