//! Test helpers module
//!
//! Mock backend, recording views and settings shared by the integration tests.

#![allow(dead_code)]

pub mod mock_backend;
pub mod recording;
pub mod test_context;

pub use mock_backend::*;
pub use recording::*;
pub use test_context::*;
