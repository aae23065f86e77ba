//! Reusable UI components shared across views

pub mod confirm_dialog;
pub mod field;
pub mod spinner;
pub mod toast;

pub use confirm_dialog::{ConfirmChoice, ConfirmDialog};
pub use field::{edit_string, FormField};
pub use spinner::Spinner;
pub use toast::{Toast, ToastManager, ToastType};
