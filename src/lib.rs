//! Rota - schedule presentation and regeneration client
//!
//! Loads solver-produced schedules with source fallbacks, filters and pages
//! them for display, edits the reference data the solver consumes (saving
//! every change in the background), and drives regeneration end to end.

pub mod domain;
pub mod edit;
pub mod error;
pub mod gateway;
pub mod id;
pub mod loader;
pub mod proxy;
pub mod regen;
pub mod render;
pub mod view;

pub use error::{Result, RotaError};
