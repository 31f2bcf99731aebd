//! Shared types and models for the meteorological observation platform
//!
//! This crate contains the domain records, partial-update inputs and the
//! request validation shared between the backend and the browser (via WASM).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
