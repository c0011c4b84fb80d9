//! Console handlers module
//!
//! This module turns console input into controller calls:
//! - Command parsing for list, editor and scheduling screens
//! - The session that mounts screens and dispatches commands

pub mod commands;
pub mod session;

// Re-export commonly used handler types
pub use commands::{is_confirmation, Command, HELP};
pub use session::{Flow, Session};
