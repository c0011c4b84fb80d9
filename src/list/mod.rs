//! Generic list screens
//!
//! One controller implementation serves every entity: the resource type
//! supplies path, columns and filters, the view draws.

pub mod controller;
pub mod pagination;
pub mod query;
pub mod selection;
pub mod view;

pub use controller::{BulkDeleteReport, EntityListController, LoadOutcome};
pub use pagination::Pagination;
pub use query::{ListQuery, Sort, SortOrder};
pub use selection::Selection;
pub use view::{ListStats, ListView, ViewMode};
