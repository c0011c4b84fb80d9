//! Backend access layer
//!
//! `ApiClient` speaks HTTP, `ModuleApi` adds per-screen fetch/save helpers and
//! `ApiHandle` gates startup on backend readiness.

pub mod client;
pub mod module_api;
pub mod ready;

pub use client::{ApiClient, Query};
pub use module_api::{FetchState, ModuleApi, SaveMethod};
pub use ready::ApiHandle;
