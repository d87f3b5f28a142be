//! Test doubles and sample data shared by unit tests.

pub mod fixtures;

pub use fixtures::ScriptedGateway;
