//! Launchpad Core - shared data structures, configuration and error handling
//!
//! Every other launchpad crate builds on the types defined here.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tokio;
pub use tracing;
