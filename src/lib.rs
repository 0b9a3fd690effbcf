//! Core of the tabular data lab: ingestion, classification, analytics
//! views, ridge regression, matrix arithmetic and per-user sessions.
//!
//! The `rusty-lab` binary renders these with egui; nothing here depends on
//! the UI.

pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod matrix;
pub mod regression;
pub mod session;

pub use error::{LabError, Result};
