//! Persistence module
//!
//! Debounced writes of settings fields to the config store.

pub mod debounce;
