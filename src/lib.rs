//! HyperDEX settings core
//!
//! Enabled-currency selection and debounced persistence of settings fields.

pub mod app;
pub mod config;
pub mod currency;
pub mod persist;
pub mod ui;
