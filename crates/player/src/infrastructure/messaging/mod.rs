//! Messaging infrastructure.
//!
//! - `EventBus`: push trail events to presentation subscribers

pub mod event_bus;

pub use event_bus::EventBus;
