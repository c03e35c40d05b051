//! Configuration module for checkwriter
//!
//! Provides XDG-compliant path resolution and user settings persistence.

pub mod paths;
pub mod settings;

pub use paths::CheckwriterPaths;
pub use settings::{CommitMode, Settings};
