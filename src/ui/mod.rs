//! User-facing output: toasts and terminal views

pub mod notification;
pub mod terminal;

pub use notification::{Notifier, Toast, ToastLevel};
pub use terminal::{Console, TerminalEditorView, TerminalListView};
