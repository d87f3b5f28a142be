//! Application layer - the trail task engine.
//!
//! - `gateway`: typed backend calls behind a timeout guard
//! - `router`: task tag to screen
//! - `orchestrator`: the progression loop
//! - `proximity`: "found" detection for map targets

pub mod config;
pub mod error;
pub mod gateway;
pub mod markers;
pub mod navigation;
pub mod orchestrator;
pub mod proximity;
pub mod router;
pub mod services;

pub use config::PlayerConfig;
pub use error::{TrailError, DEFAULT_REQUEST_TIMEOUT_MS};
pub use gateway::TrailGateway;
pub use markers::MarkerBoard;
pub use navigation::{NavigationError, QueryParams};
pub use orchestrator::{ActiveStep, ContinueResult, TrailOrchestrator, TrailPhase};
pub use proximity::{
    MarkerChange, MarkerHandle, NoPositionReason, PositionReading, ProximityConfig,
    ProximityEngine, ProximityError, ProximityStatus, ProximityUpdate,
};
pub use router::{resolve_screen, route, route_tag, RouteError, TaskScreen};
pub use services::SettingsService;
