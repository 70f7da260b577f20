//! Launchpad Repository - repository snapshot handling
//!
//! Validates GitHub URLs, shallow-clones into scratch directories and reads
//! the metadata the analyzer feeds to the model.

pub mod filter;
pub mod github_url;
pub mod metadata;
pub mod processor;
pub mod scratch;
pub mod tree;

pub use filter::*;
pub use github_url::*;
pub use metadata::*;
pub use processor::*;
pub use scratch::*;
pub use tree::*;
