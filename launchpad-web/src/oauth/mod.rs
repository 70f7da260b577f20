//! OAuth provider integrations

pub mod github;

pub use github::*;
