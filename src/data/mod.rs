//! Data layer: table model, ingestion, and column classification.
//!
//! Architecture:
//! ```text
//!  upload payload / .csv bytes
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  decode + parse → Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Table    │  named, typed, equal-length columns
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ classify  │  numeric / other column names
//!   └──────────┘
//! ```
pub mod classify;
pub mod loader;
pub mod model;

pub use classify::{classify, ColumnClassification};
pub use model::{Column, Table, TableInfo};
