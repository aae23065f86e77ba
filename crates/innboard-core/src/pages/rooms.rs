//! Rooms page controller
//!
//! Lists the active property's rooms, with a create/edit dialog and
//! confirm-before-delete. Room types are loaded alongside the rooms so the
//! dialog can offer them and the table can show type names for rooms whose
//! type arrives as a bare id.

use crate::client::ApiClient;
use crate::event::{DataEvent, EventBus, Notice};
use crate::models::{Room, RoomStatus, RoomType};
use crate::pages::{parse_i32_field, ModalState, PendingDelete};
use crate::property::PropertyStore;
use crate::validation::{check, FieldErrors, RoomPayload};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Editable state of the room dialog
#[derive(Debug, Clone, PartialEq)]
pub struct RoomForm {
    pub room_number: String,
    pub room_type_id: String,
    pub floor: String,
    pub status: RoomStatus,
    pub bed_type: String,
    pub description: String,
    pub notes: String,
    /// Selected amenity ids
    pub amenities: Vec<String>,
    pub is_active: bool,
    pub errors: FieldErrors,
}

impl Default for RoomForm {
    fn default() -> Self {
        Self {
            room_number: String::new(),
            room_type_id: String::new(),
            floor: "1".to_string(),
            status: RoomStatus::Available,
            bed_type: String::new(),
            description: String::new(),
            notes: String::new(),
            amenities: Vec::new(),
            is_active: true,
            errors: FieldErrors::new(),
        }
    }
}

impl RoomForm {
    pub fn from_room(room: &Room) -> Self {
        Self {
            room_number: room.room_number.clone(),
            room_type_id: room.room_type_id().to_string(),
            floor: room.floor.to_string(),
            status: room.status,
            bed_type: room.bed_type.clone(),
            description: room.description.clone().unwrap_or_default(),
            notes: room.notes.clone().unwrap_or_default(),
            amenities: room.amenities.clone(),
            is_active: room.is_active,
            errors: FieldErrors::new(),
        }
    }

    pub fn toggle_amenity(&mut self, id: &str) {
        if let Some(pos) = self.amenities.iter().position(|a| a == id) {
            self.amenities.remove(pos);
        } else {
            self.amenities.push(id.to_string());
        }
    }

    pub fn has_amenity(&self, id: &str) -> bool {
        self.amenities.iter().any(|a| a == id)
    }

    /// Build the request body, collecting every field problem
    pub fn validate(&self, property_id: &str) -> Result<RoomPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        let floor = match parse_i32_field(&self.floor, "Floor") {
            Ok(floor) => floor,
            Err(message) => {
                errors.insert("floor", message);
                1
            }
        };

        let payload = RoomPayload {
            room_number: self.room_number.trim().to_string(),
            property_id: property_id.to_string(),
            room_type: self.room_type_id.clone(),
            floor,
            status: self.status,
            bed_type: self.bed_type.clone(),
            description: self.description.trim().to_string(),
            notes: self.notes.trim().to_string(),
            amenities: self.amenities.clone(),
            is_active: self.is_active,
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
struct RoomsState {
    rooms: Vec<Room>,
    room_types: Vec<RoomType>,
    loading: bool,
    error: Option<String>,
    modal: ModalState<RoomForm>,
    pending_delete: Option<PendingDelete>,
}

/// Controller behind the rooms page
pub struct RoomsPage {
    client: Arc<ApiClient>,
    properties: Arc<PropertyStore>,
    bus: EventBus,
    state: RwLock<RoomsState>,
    generation: AtomicU64,
}

impl RoomsPage {
    pub fn new(client: Arc<ApiClient>, properties: Arc<PropertyStore>, bus: EventBus) -> Self {
        Self {
            client,
            properties,
            bus,
            state: RwLock::new(RoomsState::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.state.read().rooms.clone()
    }

    pub fn room_types(&self) -> Vec<RoomType> {
        self.state.read().room_types.clone()
    }

    /// Type name for a room, resolving bare-id references through the
    /// loaded room types
    pub fn room_type_name(&self, room: &Room) -> String {
        if let Some(name) = room.room_type.name() {
            return name.to_string();
        }
        let state = self.state.read();
        state
            .room_types
            .iter()
            .find(|rt| rt.id == room.room_type_id())
            .map(|rt| rt.name.clone())
            .unwrap_or_else(|| room.room_type_id().to_string())
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn modal(&self) -> ModalState<RoomForm> {
        self.state.read().modal.clone()
    }

    pub fn pending_delete(&self) -> Option<PendingDelete> {
        self.state.read().pending_delete.clone()
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Reload rooms and room types for the active property. Without a
    /// selection the page empties instead of fetching.
    pub async fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(property_id) = self.properties.selected_id() else {
            let mut state = self.state.write();
            state.rooms.clear();
            state.room_types.clear();
            state.loading = false;
            state.error = None;
            drop(state);
            self.bus.publish(DataEvent::RoomsUpdated);
            return;
        };

        {
            let mut state = self.state.write();
            state.loading = true;
            state.error = None;
        }
        self.bus.publish(DataEvent::RoomsUpdated);

        let (rooms, room_types) = tokio::join!(
            self.client.list_rooms(Some(&property_id)),
            self.client.list_room_types(Some(&property_id)),
        );

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("discarding stale rooms refresh");
            return;
        }

        {
            let mut state = self.state.write();
            state.loading = false;
            match rooms {
                Ok(list) => {
                    state.rooms = list;
                    state.error = None;
                }
                Err(e) => {
                    tracing::warn!("rooms refresh failed: {e}");
                    self.bus.report_auth(&e);
                    state.error = Some(e.page_message("Failed to fetch rooms"));
                }
            }
            match room_types {
                Ok(list) => state.room_types = list,
                // dialog keeps its previous options
                Err(e) => tracing::warn!("room-type lookup failed: {e}"),
            }
        }
        self.bus.publish(DataEvent::RoomsUpdated);
    }

    // ========================================================================
    // Dialog
    // ========================================================================

    pub fn open_create(&self) {
        self.state.write().modal = ModalState::open_new(RoomForm::default());
        self.bus.publish(DataEvent::RoomsUpdated);
    }

    pub fn open_edit(&self, id: &str) -> bool {
        let mut state = self.state.write();
        let Some(room) = state.rooms.iter().find(|r| r.id == id) else {
            return false;
        };
        state.modal = ModalState::open_edit(id, RoomForm::from_room(room));
        drop(state);
        self.bus.publish(DataEvent::RoomsUpdated);
        true
    }

    pub fn update_form(&self, update: impl FnOnce(&mut RoomForm)) {
        let mut state = self.state.write();
        if let Some(form) = state.modal.form_mut() {
            update(form);
        }
    }

    pub fn close_modal(&self) {
        self.state.write().modal.close();
        self.bus.publish(DataEvent::RoomsUpdated);
    }

    /// Validate and send the dialog. Field problems keep the dialog open
    /// with messages next to the inputs; a server failure reopens it with
    /// the failure text.
    pub async fn submit(&self) {
        let Some(property_id) = self.properties.selected_id() else {
            self.state.write().modal.fail("No property selected");
            self.bus.publish(DataEvent::RoomsUpdated);
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
                    form: RoomForm { errors, ..form },
                    editing,
                    error: None,
                    submitting: false,
                };
                self.bus.publish(DataEvent::RoomsUpdated);
                return;
            }
        };

        {
            let mut state = self.state.write();
            state.modal.begin_submit();
        }
        self.bus.publish(DataEvent::RoomsUpdated);

        let result = match &editing {
            Some(id) => self.client.update_room(id, &payload).await,
            None => self.client.create_room(&payload).await,
        };

        match result {
            Ok(_) => {
                self.state.write().modal.close();
                let message = if editing.is_some() {
                    "Room updated successfully"
                } else {
                    "Room added successfully"
                };
                self.bus.notify(Notice::success(message));
                self.refresh().await;
            }
            Err(e) => {
                let fallback = if editing.is_some() {
                    "Failed to update room"
                } else {
                    "Failed to add room"
                };
                self.bus.report_auth(&e);
                self.state.write().modal.fail(e.page_message(fallback));
                self.bus.publish(DataEvent::RoomsUpdated);
            }
        }
    }

    // ========================================================================
    // Delete
    // ========================================================================

    pub fn request_delete(&self, id: &str) -> bool {
        let mut state = self.state.write();
        let Some(room) = state.rooms.iter().find(|r| r.id == id) else {
            return false;
        };
        state.pending_delete = Some(PendingDelete {
            id: id.to_string(),
            label: format!("room {}", room.room_number),
        });
        drop(state);
        self.bus.publish(DataEvent::RoomsUpdated);
        true
    }

    pub fn cancel_delete(&self) {
        self.state.write().pending_delete = None;
        self.bus.publish(DataEvent::RoomsUpdated);
    }

    pub async fn confirm_delete(&self) {
        let Some(pending) = self.state.write().pending_delete.take() else {
            return;
        };
        self.bus.publish(DataEvent::RoomsUpdated);

        match self.client.delete_room(&pending.id).await {
            Ok(()) => {
                self.bus.notify(Notice::success("Room deleted successfully"));
                self.refresh().await;
            }
            Err(e) => {
                tracing::warn!("room delete failed: {e}");
                self.bus.report_auth(&e);
                self.bus
                    .notify(Notice::error(e.page_message("Failed to delete room")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form_is_active_first_floor() {
        let form = RoomForm::default();
        assert!(form.is_active);
        assert_eq!(form.floor, "1");
        assert_eq!(form.status, RoomStatus::Available);
    }

    #[test]
    fn test_validate_collects_required_fields() {
        let form = RoomForm {
            room_number: String::new(),
            room_type_id: String::new(),
            bed_type: String::new(),
            ..RoomForm::default()
        };
        let errors = form.validate("p1").unwrap_err();
        assert_eq!(errors.get("room_number"), Some("Room number is required"));
        assert_eq!(errors.get("room_type"), Some("Room type is required"));
        assert_eq!(errors.get("bed_type"), Some("Bed type is required"));
    }

    #[test]
    fn test_validate_floor_must_parse() {
        let form = RoomForm {
            room_number: "101".to_string(),
            room_type_id: "rt1".to_string(),
            bed_type: "queen".to_string(),
            floor: "abc".to_string(),
            ..RoomForm::default()
        };
        let errors = form.validate("p1").unwrap_err();
        assert_eq!(errors.get("floor"), Some("Floor must be a number"));
    }

    #[test]
    fn test_validate_builds_scoped_payload() {
        let form = RoomForm {
            room_number: " 101 ".to_string(),
            room_type_id: "rt1".to_string(),
            bed_type: "queen".to_string(),
            floor: "2".to_string(),
            amenities: vec!["ac".to_string(), "tv".to_string()],
            ..RoomForm::default()
        };
        let payload = form.validate("p1").unwrap();
        assert_eq!(payload.property_id, "p1");
        assert_eq!(payload.room_number, "101");
        assert_eq!(payload.floor, 2);
        assert_eq!(payload.amenities, vec!["ac", "tv"]);
    }

    #[test]
    fn test_toggle_amenity() {
        let mut form = RoomForm::default();
        form.toggle_amenity("ac");
        assert!(form.has_amenity("ac"));
        form.toggle_amenity("ac");
        assert!(!form.has_amenity("ac"));
    }

    #[test]
    fn test_form_from_room_round_trip() {
        let json = r#"{
            "_id": "r1",
            "roomNumber": "101",
            "propertyId": "p1",
            "roomType": "rt1",
            "floor": 3,
            "status": "maintenance",
            "bedType": "king",
            "notes": "paint peeling",
            "amenities": ["ac"],
            "isActive": false
        }"#;
        let room: Room = serde_json::from_str(json).unwrap();
        let form = RoomForm::from_room(&room);
        assert_eq!(form.floor, "3");
        assert_eq!(form.status, RoomStatus::Maintenance);
        assert_eq!(form.notes, "paint peeling");
        assert!(!form.is_active);
    }
}
