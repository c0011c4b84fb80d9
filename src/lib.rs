//! Academy Admin
//!
//! Admin client for a martial-arts academy management backend.
//! This library provides generic list and editor controllers over the
//! academy's REST resources (units, activities, students), personal
//! training scheduling, technique import/export and a console front end.

pub mod api;
pub mod config;
pub mod editor;
pub mod handlers;
pub mod list;
pub mod models;
pub mod router;
pub mod services;
pub mod state;
pub mod transfer;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{AcademyError, Result};

// Re-export main components for easy access
pub use api::{ApiClient, ApiHandle};
pub use editor::EntityEditor;
pub use list::EntityListController;
pub use router::Route;
pub use services::ServiceFactory;
pub use state::{AppContext, PreferenceStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
