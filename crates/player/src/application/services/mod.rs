//! Application services
//!
//! Services that sit on top of platform ports and carry no trail logic.

pub mod settings_service;

pub use settings_service::SettingsService;
