//! Medseed Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the medseed workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`SeedError`] and the process exit-code taxonomy
//! - **Logging**: [`logging::LogConfig`] and [`logging::init_logging`]
//!
//! # Example
//!
//! ```no_run
//! use medseed_common::{Result, SeedError};
//!
//! fn require_uri(uri: Option<String>) -> Result<String> {
//!     uri.ok_or_else(|| SeedError::config("MONGODB_URI is not set"))
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{ExitStatus, Result, SeedError};
