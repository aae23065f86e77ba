//! Room-types page controller

use crate::client::ApiClient;
use crate::event::{DataEvent, EventBus, Notice};
use crate::models::RoomType;
use crate::pages::{parse_f64_field, parse_u32_field, ModalState, PendingDelete};
use crate::property::PropertyStore;
use crate::validation::{check, FieldErrors, RoomTypePayload};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Editable state of the room-type dialog
#[derive(Debug, Clone, PartialEq)]
pub struct RoomTypeForm {
    pub name: String,
    pub description: String,
    pub base_rate: String,
    pub capacity: String,
    pub errors: FieldErrors,
}

impl Default for RoomTypeForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            base_rate: String::new(),
            capacity: "1".to_string(),
            errors: FieldErrors::new(),
        }
    }
}

impl RoomTypeForm {
    pub fn from_room_type(room_type: &RoomType) -> Self {
        Self {
            name: room_type.name.clone(),
            description: room_type.description.clone().unwrap_or_default(),
            base_rate: format!("{}", room_type.base_rate),
            capacity: room_type.capacity.to_string(),
            errors: FieldErrors::new(),
        }
    }

    pub fn validate(&self, property_id: &str) -> Result<RoomTypePayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        let base_rate = match parse_f64_field(&self.base_rate, "Base rate") {
            Ok(rate) => rate,
            Err(message) => {
                errors.insert("base_rate", message);
                0.0
            }
        };
        let capacity = match parse_u32_field(&self.capacity, "Capacity") {
            Ok(capacity) => capacity,
            Err(message) => {
                errors.insert("capacity", message);
                1
            }
        };

        let payload = RoomTypePayload {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            base_rate,
            capacity,
            property_id: property_id.to_string(),
        };

        if let Err(derived) = check(&payload) {
            for (field, message) in derived.iter() {
                errors.insert(field, message);
            }
        }

        errors.into_result().map(|_| payload)
    }
}

#[derive(Default)]
struct RoomTypesState {
    room_types: Vec<RoomType>,
    loading: bool,
    error: Option<String>,
    modal: ModalState<RoomTypeForm>,
    pending_delete: Option<PendingDelete>,
}

/// Controller behind the room-types page
pub struct RoomTypesPage {
    client: Arc<ApiClient>,
    properties: Arc<PropertyStore>,
    bus: EventBus,
    state: RwLock<RoomTypesState>,
    generation: AtomicU64,
}

impl RoomTypesPage {
    pub fn new(client: Arc<ApiClient>, properties: Arc<PropertyStore>, bus: EventBus) -> Self {
        Self {
            client,
            properties,
            bus,
            state: RwLock::new(RoomTypesState::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn room_types(&self) -> Vec<RoomType> {
        self.state.read().room_types.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn modal(&self) -> ModalState<RoomTypeForm> {
        self.state.read().modal.clone()
    }

    pub fn pending_delete(&self) -> Option<PendingDelete> {
        self.state.read().pending_delete.clone()
    }

    pub async fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(property_id) = self.properties.selected_id() else {
            let mut state = self.state.write();
            state.room_types.clear();
            state.loading = false;
            state.error = None;
            drop(state);
            self.bus.publish(DataEvent::RoomTypesUpdated);
            return;
        };

        {
            let mut state = self.state.write();
            state.loading = true;
            state.error = None;
        }
        self.bus.publish(DataEvent::RoomTypesUpdated);

        let result = self.client.list_room_types(Some(&property_id)).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("discarding stale room-types refresh");
            return;
        }

        {
            let mut state = self.state.write();
            state.loading = false;
            match result {
                Ok(list) => {
                    state.room_types = list;
                    state.error = None;
                }
                Err(e) => {
                    tracing::warn!("room-types refresh failed: {e}");
                    self.bus.report_auth(&e);
                    state.error = Some(e.page_message("Failed to fetch room types"));
                }
            }
        }
        self.bus.publish(DataEvent::RoomTypesUpdated);
    }

    pub fn open_create(&self) {
        self.state.write().modal = ModalState::open_new(RoomTypeForm::default());
        self.bus.publish(DataEvent::RoomTypesUpdated);
    }

    pub fn open_edit(&self, id: &str) -> bool {
        let mut state = self.state.write();
        let Some(room_type) = state.room_types.iter().find(|rt| rt.id == id) else {
            return false;
        };
        state.modal = ModalState::open_edit(id, RoomTypeForm::from_room_type(room_type));
        drop(state);
        self.bus.publish(DataEvent::RoomTypesUpdated);
        true
    }

    pub fn update_form(&self, update: impl FnOnce(&mut RoomTypeForm)) {
        let mut state = self.state.write();
        if let Some(form) = state.modal.form_mut() {
            update(form);
        }
    }

    pub fn close_modal(&self) {
        self.state.write().modal.close();
        self.bus.publish(DataEvent::RoomTypesUpdated);
    }

    /// Validate and send the dialog; the new type is scoped to the active
    /// property and the list refetched on success.
    pub async fn submit(&self) {
        let Some(property_id) = self.properties.selected_id() else {
            self.state.write().modal.fail("No property selected");
            self.bus.publish(DataEvent::RoomTypesUpdated);
            return;
        };

        let (form, editing) = {
            let state = self.state.read();
            match &state.modal {
                ModalState::Open {
                    form,
                    editing,
                    submitting: false,
                    ..
                } => (form.clone(), editing.clone()),
                _ => return,
            }
        };

        let payload = match form.validate(&property_id) {
            Ok(payload) => payload,
            Err(errors) => {
                self.state.write().modal = ModalState::Open {
                    form: RoomTypeForm { errors, ..form },
                    editing,
                    error: None,
                    submitting: false,
                };
                self.bus.publish(DataEvent::RoomTypesUpdated);
                return;
            }
        };

        {
            let mut state = self.state.write();
            state.modal.begin_submit();
        }
        self.bus.publish(DataEvent::RoomTypesUpdated);

        let result = match &editing {
            Some(id) => self.client.update_room_type(id, &payload).await,
            None => self.client.create_room_type(&payload).await,
        };

        match result {
            Ok(_) => {
                self.state.write().modal.close();
                let message = if editing.is_some() {
                    "Room type updated successfully"
                } else {
                    "Room type added successfully"
                };
                self.bus.notify(Notice::success(message));
                self.refresh().await;
            }
            Err(e) => {
                let fallback = if editing.is_some() {
                    "Failed to update room type"
                } else {
                    "Failed to add room type"
                };
                self.bus.report_auth(&e);
                self.state.write().modal.fail(e.page_message(fallback));
                self.bus.publish(DataEvent::RoomTypesUpdated);
            }
        }
    }

    pub fn request_delete(&self, id: &str) -> bool {
        let mut state = self.state.write();
        let Some(room_type) = state.room_types.iter().find(|rt| rt.id == id) else {
            return false;
        };
        state.pending_delete = Some(PendingDelete {
            id: id.to_string(),
            label: format!("room type {}", room_type.name),
        });
        drop(state);
        self.bus.publish(DataEvent::RoomTypesUpdated);
        true
    }

    pub fn cancel_delete(&self) {
        self.state.write().pending_delete = None;
        self.bus.publish(DataEvent::RoomTypesUpdated);
    }

    pub async fn confirm_delete(&self) {
        let Some(pending) = self.state.write().pending_delete.take() else {
            return;
        };
        self.bus.publish(DataEvent::RoomTypesUpdated);

        match self.client.delete_room_type(&pending.id).await {
            Ok(()) => {
                self.bus
                    .notify(Notice::success("Room type deleted successfully"));
                self.refresh().await;
            }
            Err(e) => {
                tracing::warn!("room-type delete failed: {e}");
                self.bus.report_auth(&e);
                self.bus
                    .notify(Notice::error(e.page_message("Failed to delete room type")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_name_and_numbers() {
        let form = RoomTypeForm {
            name: String::new(),
            base_rate: String::new(),
            capacity: "two".to_string(),
            ..RoomTypeForm::default()
        };
        let errors = form.validate("p1").unwrap_err();
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("base_rate"), Some("Base rate is required"));
        assert_eq!(errors.get("capacity"), Some("Capacity must be a number"));
    }

    #[test]
    fn test_validate_bounds() {
        let form = RoomTypeForm {
            name: "Deluxe".to_string(),
            base_rate: "-10".to_string(),
            capacity: "0".to_string(),
            ..RoomTypeForm::default()
        };
        let errors = form.validate("p1").unwrap_err();
        assert_eq!(errors.get("base_rate"), Some("Base rate must be positive"));
        assert_eq!(errors.get("capacity"), Some("Capacity must be at least 1"));
    }

    #[test]
    fn test_validate_scopes_to_property() {
        let form = RoomTypeForm {
            name: "Deluxe".to_string(),
            description: "Sea view".to_string(),
            base_rate: "120.50".to_string(),
            capacity: "2".to_string(),
            ..RoomTypeForm::default()
        };
        let payload = form.validate("p1").unwrap();
        assert_eq!(payload.property_id, "p1");
        assert_eq!(payload.base_rate, 120.50);
        assert_eq!(payload.capacity, 2);
    }

    #[test]
    fn test_form_from_room_type() {
        let json = r#"{ "_id": "rt1", "name": "Suite", "baseRate": 200.0, "capacity": 4 }"#;
        let room_type: RoomType = serde_json::from_str(json).unwrap();
        let form = RoomTypeForm::from_room_type(&room_type);
        assert_eq!(form.name, "Suite");
        assert_eq!(form.base_rate, "200");
        assert_eq!(form.capacity, "4");
    }
}
