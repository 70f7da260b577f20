//! Launchpad Analysis - repository deployment analysis
//!
//! Turns a GitHub URL into an [`AnalysisRecord`](launchpad_core::AnalysisRecord):
//! clone, extract metadata, prompt the model, parse its JSON answer, store it.

pub mod analyzer;
pub mod extract;
pub mod gemini;
pub mod prompt;
pub mod store;

pub use analyzer::*;
pub use extract::*;
pub use gemini::*;
pub use prompt::*;
pub use store::*;
