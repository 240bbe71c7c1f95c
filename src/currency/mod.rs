//! Currency module
//!
//! Supported currency catalog, enabled currency state and the reconciler
//! that turns selector updates into state changes.

pub mod catalog;
pub mod reconcile;
pub mod state;
