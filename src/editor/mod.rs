//! Generic editor screens
//!
//! Forms are declared per resource in [`schema`]; [`EntityEditor`] drives
//! loading, validation, saving and auto-save for any of them.

pub mod controller;
pub mod form;
pub mod schema;
pub mod validation;
pub mod view;

pub use controller::{EntityEditor, SaveOutcome};
pub use form::{FieldKind, FieldSpec, FormState, Normalizer, Rule};
pub use schema::FormResource;
pub use validation::{map_server_errors, validate_field, validate_form};
pub use view::{EditorMode, EditorView, SaveStatus};
