//! Medseed Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! One-shot loader that replaces the medicines collection with the contents
//! of a CSV export.
//!
//! # Overview
//!
//! - **Source**: Read the CSV into header-keyed records ([`source`])
//! - **Transform**: Normalize records into [`MedicineDocument`]s ([`transform`])
//! - **Store**: Collection access behind the [`MedicineStore`] trait ([`store`])
//! - **Load**: Clear, insert in batches, create indexes ([`loader`])
//! - **Pipeline**: Orchestrates a full run ([`pipeline::run`])

pub mod config;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod progress;
pub mod source;
pub mod store;
pub mod transform;

// Re-export commonly used types
pub use config::{SeedArgs, SeedConfig};
pub use medseed_common::{ExitStatus, Result, SeedError};
pub use models::MedicineDocument;
pub use pipeline::{run, RunSummary};
pub use store::MedicineStore;
