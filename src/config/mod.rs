//! Configuration module
//!
//! Persistent key/value storage for settings fields and the tunables of the
//! settings panel itself.

pub mod settings;
pub mod store;
