//! Inventory (reservations) page controller
//!
//! Server-side pagination and filtering: every filter or page change goes
//! back to `GET /reservations` rather than slicing a local list. Changing a
//! filter resets to page 1 so the new result set starts from the top.

use crate::client::ApiClient;
use crate::event::{DataEvent, EventBus, Notice};
use crate::models::{
    FilterField, PaymentStatus, Reservation, ReservationFilters, ReservationQuery,
    ReservationSource, ReservationStatus, RoomType,
};
use crate::pages::{parse_f64_field, ModalState, PendingDelete};
use crate::property::PropertyStore;
use crate::validation::{
    check, date_to_utc, parse_date, FieldErrors, GuestPayload, ReservationPayload,
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const PAGE_LIMIT: u32 = 10;

/// Editable state of the reservation dialog
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationForm {
    pub reservation_number: String,
    pub guest_first_name: String,
    pub guest_last_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub room_type_id: String,
    /// "YYYY-MM-DD"
    pub check_in: String,
    pub check_out: String,
    pub status: ReservationStatus,
    pub total_amount: String,
    pub payment_status: PaymentStatus,
    pub source: ReservationSource,
    pub special_requests: String,
    pub notes: String,
    pub errors: FieldErrors,
}

impl Default for ReservationForm {
    fn default() -> Self {
        Self {
            reservation_number: String::new(),
            guest_first_name: String::new(),
            guest_last_name: String::new(),
            guest_email: String::new(),
            guest_phone: String::new(),
            room_type_id: String::new(),
            check_in: String::new(),
            check_out: String::new(),
            status: ReservationStatus::Confirmed,
            total_amount: "0".to_string(),
            payment_status: PaymentStatus::Pending,
            source: ReservationSource::Direct,
            special_requests: String::new(),
            notes: String::new(),
            errors: FieldErrors::new(),
        }
    }
}

impl ReservationForm {
    pub fn from_reservation(reservation: &Reservation) -> Self {
        Self {
            reservation_number: reservation.reservation_number.clone(),
            guest_first_name: reservation.guest.first_name.clone(),
            guest_last_name: reservation.guest.last_name.clone(),
            guest_email: reservation.guest.email.clone(),
            guest_phone: reservation.guest.phone.clone().unwrap_or_default(),
            room_type_id: reservation
                .room_type_id
                .clone()
                .or_else(|| reservation.room_type.as_ref().map(|rt| rt.id.clone()))
                .unwrap_or_default(),
            check_in: reservation.check_in_date.format("%Y-%m-%d").to_string(),
            check_out: reservation.check_out_date.format("%Y-%m-%d").to_string(),
            status: reservation.status,
            total_amount: format!("{}", reservation.total_amount),
            payment_status: reservation.payment_status,
            source: reservation.source,
            special_requests: reservation.special_requests.clone().unwrap_or_default(),
            notes: reservation.notes.clone().unwrap_or_default(),
            errors: FieldErrors::new(),
        }
    }

    /// Build the request body. Dates must parse and check-out has to land
    /// strictly after check-in.
    pub fn validate(&self, property_id: &str) -> Result<ReservationPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        let check_in = if self.check_in.trim().is_empty() {
            errors.insert("check_in_date", "Check-in date is required");
            None
        } else {
            let parsed = parse_date(&self.check_in);
            if parsed.is_none() {
                errors.insert("check_in_date", "Check-in date must be YYYY-MM-DD");
            }
            parsed
        };
        let check_out = if self.check_out.trim().is_empty() {
            errors.insert("check_out_date", "Check-out date is required");
            None
        } else {
            let parsed = parse_date(&self.check_out);
            if parsed.is_none() {
                errors.insert("check_out_date", "Check-out date must be YYYY-MM-DD");
            }
            parsed
        };

        if let (Some(check_in), Some(check_out)) = (check_in, check_out) {
            if check_out <= check_in {
                errors.insert(
                    "check_out_date",
                    "Check-out date must be after check-in date",
                );
            }
        }

        let total_amount = match parse_f64_field(&self.total_amount, "Total amount") {
            Ok(amount) => amount,
            Err(message) => {
                errors.insert("total_amount", message);
                0.0
            }
        };

        if self.room_type_id.is_empty() {
            errors.insert("room_type_id", "Room type is required");
        }

        let payload = ReservationPayload {
            reservation_number: self.reservation_number.trim().to_string(),
            guest: GuestPayload {
                first_name: self.guest_first_name.trim().to_string(),
                last_name: self.guest_last_name.trim().to_string(),
                email: self.guest_email.trim().to_string(),
                phone: self.guest_phone.trim().to_string(),
            },
            room_type_id: if self.room_type_id.is_empty() {
                None
            } else {
                Some(self.room_type_id.clone())
            },
            check_in_date: date_to_utc(check_in.unwrap_or_default()),
            check_out_date: date_to_utc(check_out.unwrap_or_default()),
            status: self.status,
            total_amount,
            payment_status: self.payment_status,
            source: self.source,
            special_requests: self.special_requests.trim().to_string(),
            notes: self.notes.trim().to_string(),
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

struct InventoryState {
    reservations: Vec<Reservation>,
    room_types: Vec<RoomType>,
    loading: bool,
    error: Option<String>,
    filters: ReservationFilters,
    page: u32,
    pages: u32,
    total: u64,
    modal: ModalState<ReservationForm>,
    pending_delete: Option<PendingDelete>,
}

impl Default for InventoryState {
    fn default() -> Self {
        Self {
            reservations: Vec::new(),
            room_types: Vec::new(),
            loading: false,
            error: None,
            filters: ReservationFilters::default(),
            page: 1,
            pages: 1,
            total: 0,
            modal: ModalState::Closed,
            pending_delete: None,
        }
    }
}

/// Controller behind the inventory page
pub struct InventoryPage {
    client: Arc<ApiClient>,
    properties: Arc<PropertyStore>,
    bus: EventBus,
    state: RwLock<InventoryState>,
    generation: AtomicU64,
}

impl InventoryPage {
    pub fn new(client: Arc<ApiClient>, properties: Arc<PropertyStore>, bus: EventBus) -> Self {
        Self {
            client,
            properties,
            bus,
            state: RwLock::new(InventoryState::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn reservations(&self) -> Vec<Reservation> {
        self.state.read().reservations.clone()
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

    pub fn filters(&self) -> ReservationFilters {
        self.state.read().filters.clone()
    }

    pub fn has_filters(&self) -> bool {
        !self.state.read().filters.is_empty()
    }

    pub fn page(&self) -> u32 {
        self.state.read().page
    }

    pub fn pages(&self) -> u32 {
        self.state.read().pages
    }

    pub fn total(&self) -> u64 {
        self.state.read().total
    }

    pub fn modal(&self) -> ModalState<ReservationForm> {
        self.state.read().modal.clone()
    }

    pub fn pending_delete(&self) -> Option<PendingDelete> {
        self.state.read().pending_delete.clone()
    }

    fn query(&self) -> ReservationQuery {
        let state = self.state.read();
        ReservationQuery {
            page: state.page,
            limit: PAGE_LIMIT,
            property_id: self.properties.selected_id(),
            filters: state.filters.clone(),
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    pub async fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if self.properties.selected_id().is_none() {
            let mut state = self.state.write();
            state.reservations.clear();
            state.room_types.clear();
            state.loading = false;
            state.error = None;
            state.total = 0;
            state.pages = 1;
            state.page = 1;
            drop(state);
            self.bus.publish(DataEvent::ReservationsUpdated);
            return;
        }

        {
            let mut state = self.state.write();
            state.loading = true;
            state.error = None;
        }
        self.bus.publish(DataEvent::ReservationsUpdated);

        let query = self.query();
        let property_id = query.property_id.clone();
        let (page_result, room_types) = tokio::join!(
            self.client.list_reservations(&query),
            self.client.list_room_types(property_id.as_deref()),
        );

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("discarding stale reservations refresh");
            return;
        }

        {
            let mut state = self.state.write();
            state.loading = false;
            match page_result {
                Ok(page) => {
                    state.total = page
                        .pagination
                        .map(|p| p.total)
                        .or(page.count)
                        .unwrap_or(page.items.len() as u64);
                    state.pages = page.pagination.map(|p| p.pages.max(1)).unwrap_or(1);
                    if let Some(pagination) = page.pagination {
                        // trust the server's clamping
                        state.page = pagination.page.max(1);
                    }
                    state.reservations = page.items;
                    state.error = None;
                }
                Err(e) => {
                    tracing::warn!("reservations refresh failed: {e}");
                    self.bus.report_auth(&e);
                    state.error = Some(e.page_message("Failed to fetch reservations"));
                }
            }
            match room_types {
                Ok(list) => state.room_types = list,
                Err(e) => tracing::warn!("room-type lookup failed: {e}"),
            }
        }
        self.bus.publish(DataEvent::ReservationsUpdated);
    }

    // ========================================================================
    // Filters & paging
    // ========================================================================

    /// Change one filter and reset to the first page. The caller refreshes.
    pub fn set_filter(&self, field: FilterField, value: String) {
        let mut state = self.state.write();
        if state.filters.get(field) == value {
            return;
        }
        state.filters.set(field, value);
        state.page = 1;
        drop(state);
        self.bus.publish(DataEvent::ReservationsUpdated);
    }

    pub fn clear_filters(&self) {
        let mut state = self.state.write();
        state.filters = ReservationFilters::default();
        state.page = 1;
        drop(state);
        self.bus.publish(DataEvent::ReservationsUpdated);
    }

    pub fn set_page(&self, page: u32) {
        self.state.write().page = page.max(1);
    }

    /// Move forward one page; false when already on the last
    pub fn next_page(&self) -> bool {
        let mut state = self.state.write();
        if state.page < state.pages {
            state.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&self) -> bool {
        let mut state = self.state.write();
        if state.page > 1 {
            state.page -= 1;
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Dialog
    // ========================================================================

    pub fn open_create(&self) {
        self.state.write().modal = ModalState::open_new(ReservationForm::default());
        self.bus.publish(DataEvent::ReservationsUpdated);
    }

    pub fn open_edit(&self, id: &str) -> bool {
        let mut state = self.state.write();
        let Some(reservation) = state.reservations.iter().find(|r| r.id == id) else {
            return false;
        };
        state.modal = ModalState::open_edit(id, ReservationForm::from_reservation(reservation));
        drop(state);
        self.bus.publish(DataEvent::ReservationsUpdated);
        true
    }

    pub fn update_form(&self, update: impl FnOnce(&mut ReservationForm)) {
        let mut state = self.state.write();
        if let Some(form) = state.modal.form_mut() {
            update(form);
        }
    }

    pub fn close_modal(&self) {
        self.state.write().modal.close();
        self.bus.publish(DataEvent::ReservationsUpdated);
    }

    pub async fn submit(&self) {
        let Some(property_id) = self.properties.selected_id() else {
            self.state.write().modal.fail("No property selected");
            self.bus.publish(DataEvent::ReservationsUpdated);
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
                    form: ReservationForm { errors, ..form },
                    editing,
                    error: None,
                    submitting: false,
                };
                self.bus.publish(DataEvent::ReservationsUpdated);
                return;
            }
        };

        {
            let mut state = self.state.write();
            state.modal.begin_submit();
        }
        self.bus.publish(DataEvent::ReservationsUpdated);

        let result = match &editing {
            Some(id) => self.client.update_reservation(id, &payload).await,
            None => self.client.create_reservation(&payload).await,
        };

        match result {
            Ok(_) => {
                self.state.write().modal.close();
                let message = if editing.is_some() {
                    "Reservation updated successfully"
                } else {
                    "Reservation added successfully"
                };
                self.bus.notify(Notice::success(message));
                self.refresh().await;
            }
            Err(e) => {
                let fallback = if editing.is_some() {
                    "Failed to update reservation"
                } else {
                    "Failed to add reservation"
                };
                self.bus.report_auth(&e);
                self.state.write().modal.fail(e.page_message(fallback));
                self.bus.publish(DataEvent::ReservationsUpdated);
            }
        }
    }

    // ========================================================================
    // Delete
    // ========================================================================

    pub fn request_delete(&self, id: &str) -> bool {
        let mut state = self.state.write();
        let Some(reservation) = state.reservations.iter().find(|r| r.id == id) else {
            return false;
        };
        state.pending_delete = Some(PendingDelete {
            id: id.to_string(),
            label: format!("reservation {}", reservation.reservation_number),
        });
        drop(state);
        self.bus.publish(DataEvent::ReservationsUpdated);
        true
    }

    pub fn cancel_delete(&self) {
        self.state.write().pending_delete = None;
        self.bus.publish(DataEvent::ReservationsUpdated);
    }

    pub async fn confirm_delete(&self) {
        let Some(pending) = self.state.write().pending_delete.take() else {
            return;
        };
        self.bus.publish(DataEvent::ReservationsUpdated);

        match self.client.delete_reservation(&pending.id).await {
            Ok(()) => {
                self.bus
                    .notify(Notice::success("Reservation deleted successfully"));
                self.refresh().await;
            }
            Err(e) => {
                tracing::warn!("reservation delete failed: {e}");
                self.bus.report_auth(&e);
                self.bus
                    .notify(Notice::error(e.page_message("Failed to delete reservation")));
            }
        }
    }
}
