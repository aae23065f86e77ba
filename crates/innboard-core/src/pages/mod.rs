//! Page controllers
//!
//! Each admin page gets a controller owning its data, load/error state, and
//! modal machine, with the rendering layer kept out entirely. Controllers
//! are shared behind `Arc`, mutate through `parking_lot::RwLock`, and
//! announce changes on the [`EventBus`](crate::event::EventBus) so the UI
//! can redraw and CLI callers can observe completion.

pub mod add_property;
pub mod inventory;
pub mod room_types;
pub mod rooms;
pub mod tasks;

pub use add_property::AddPropertyPage;
pub use inventory::{InventoryPage, ReservationForm};
pub use room_types::{RoomTypeForm, RoomTypesPage};
pub use rooms::{RoomForm, RoomsPage};
pub use tasks::TasksPage;

/// Create/edit dialog lifecycle shared by every page with a modal.
///
/// `Closed` → `Open` (create or edit) → submitting → `Closed` on success,
/// back to `Open` with the failure text otherwise. The form stays visible
/// while a submit is in flight so a failure can return to it intact.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalState<F> {
    Closed,
    Open {
        form: F,
        /// Id of the record being edited; `None` while creating
        editing: Option<String>,
        /// Submit failure shown inside the dialog
        error: Option<String>,
        submitting: bool,
    },
}

impl<F> Default for ModalState<F> {
    fn default() -> Self {
        ModalState::Closed
    }
}

impl<F> ModalState<F> {
    pub fn open_new(form: F) -> Self {
        ModalState::Open {
            form,
            editing: None,
            error: None,
            submitting: false,
        }
    }

    pub fn open_edit(id: impl Into<String>, form: F) -> Self {
        ModalState::Open {
            form,
            editing: Some(id.into()),
            error: None,
            submitting: false,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open { .. })
    }

    pub fn is_submitting(&self) -> bool {
        matches!(
            self,
            ModalState::Open {
                submitting: true,
                ..
            }
        )
    }

    /// Id under edit, when the dialog is open in edit mode
    pub fn editing(&self) -> Option<&str> {
        match self {
            ModalState::Open { editing, .. } => editing.as_deref(),
            ModalState::Closed => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ModalState::Open { error, .. } => error.as_deref(),
            ModalState::Closed => None,
        }
    }

    pub fn form(&self) -> Option<&F> {
        match self {
            ModalState::Open { form, .. } => Some(form),
            ModalState::Closed => None,
        }
    }

    /// Mutable form access, blocked while a submit is in flight
    pub fn form_mut(&mut self) -> Option<&mut F> {
        match self {
            ModalState::Open {
                form,
                submitting: false,
                ..
            } => Some(form),
            _ => None,
        }
    }

    /// Lock the form for submission; no-op when closed
    pub fn begin_submit(&mut self) {
        if let ModalState::Open {
            error, submitting, ..
        } = self
        {
            *error = None;
            *submitting = true;
        }
    }

    /// Reopen the form with a failure message
    pub fn fail(&mut self, message: impl Into<String>) {
        if let ModalState::Open {
            error, submitting, ..
        } = self
        {
            *error = Some(message.into());
            *submitting = false;
        }
    }

    pub fn close(&mut self) {
        *self = ModalState::Closed;
    }
}

/// A delete waiting for its confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: String,
    /// What the confirm dialog names, e.g. "room 101"
    pub label: String,
}

// ============================================================================
// Form field parsing
// ============================================================================

/// Parse a required integer field, with the field's display name in the
/// message ("Floor is required" / "Floor must be a number")
pub(crate) fn parse_i32_field(value: &str, name: &str) -> Result<i32, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{name} is required"));
    }
    trimmed
        .parse::<i32>()
        .map_err(|_| format!("{name} must be a number"))
}

pub(crate) fn parse_u32_field(value: &str, name: &str) -> Result<u32, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{name} is required"));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| format!("{name} must be a number"))
}

pub(crate) fn parse_f64_field(value: &str, name: &str) -> Result<f64, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{name} is required"));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| format!("{name} must be a number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct DummyForm {
        value: String,
    }

    #[test]
    fn test_modal_lifecycle() {
        let mut modal: ModalState<DummyForm> = ModalState::default();
        assert!(!modal.is_open());

        modal = ModalState::open_new(DummyForm::default());
        assert!(modal.is_open());
        assert_eq!(modal.editing(), None);

        modal.begin_submit();
        assert!(modal.is_submitting());
        assert!(modal.form_mut().is_none());

        modal.fail("Name already taken");
        assert!(!modal.is_submitting());
        assert_eq!(modal.error(), Some("Name already taken"));
        assert!(modal.form_mut().is_some());

        modal.close();
        assert!(!modal.is_open());
    }

    #[test]
    fn test_modal_edit_carries_id() {
        let modal = ModalState::open_edit("r1", DummyForm::default());
        assert_eq!(modal.editing(), Some("r1"));
    }

    #[test]
    fn test_begin_submit_clears_previous_error() {
        let mut modal = ModalState::open_new(DummyForm::default());
        modal.fail("boom");
        modal.begin_submit();
        assert_eq!(modal.error(), None);
    }

    #[test]
    fn test_numeric_field_parsing() {
        assert_eq!(parse_i32_field(" 3 ", "Floor"), Ok(3));
        assert_eq!(
            parse_i32_field("", "Floor"),
            Err("Floor is required".to_string())
        );
        assert_eq!(
            parse_i32_field("abc", "Floor"),
            Err("Floor must be a number".to_string())
        );
        assert_eq!(parse_f64_field("99.5", "Base rate"), Ok(99.5));
        assert_eq!(
            parse_u32_field("-1", "Capacity"),
            Err("Capacity must be a number".to_string())
        );
    }
}
