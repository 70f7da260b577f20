//! HTTP request handlers for the Launchpad web server

pub mod analysis;
pub mod health;
pub mod oauth;
pub mod types;

pub use analysis::*;
pub use health::*;
pub use oauth::*;

pub use types::*;
