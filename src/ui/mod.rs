//! UI components module
//!
//! Headless state behind the settings view: the enabled-currency selector,
//! the advanced form and its field validation.

pub mod currency_selection;
pub mod settings_form;
pub mod validation;
