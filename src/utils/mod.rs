//! Utility modules
//!
//! This module contains common utilities used throughout the application,
//! including error handling, logging setup, timers and helper functions.

pub mod debounce;
pub mod errors;
pub mod helpers;
pub mod logging;

pub use errors::{AcademyError, Result};
