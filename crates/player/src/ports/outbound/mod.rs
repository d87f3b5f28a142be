//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to interact with external systems without
//! depending on concrete implementations.

pub mod api_error;
pub mod platform;
pub mod player_events;
pub mod raw_api_port;
pub mod trail_gateway_port;

pub use api_error::ApiError;
pub use platform::{storage_keys, StorageProvider};
pub use player_events::TrailEvent;
pub use raw_api_port::RawApiPort;
pub use trail_gateway_port::{ChatReply, GatewayError, NextStep, TrailGatewayPort};

#[cfg(any(test, feature = "testing"))]
pub use raw_api_port::MockRawApiPort;
#[cfg(any(test, feature = "testing"))]
pub use trail_gateway_port::MockTrailGatewayPort;
