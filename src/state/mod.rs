//! State management module
//!
//! Local preferences and the context shared by the console handlers

pub mod context;
pub mod storage;

// Re-export commonly used state components
pub use context::AppContext;
pub use storage::{Draft, PreferenceStore, Preferences};
