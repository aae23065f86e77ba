//! Reservation model, list filters, and query building

use super::room_type::RoomType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A guest booking against a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(rename = "_id")]
    pub id: String,
    pub reservation_number: String,
    pub guest: Guest,
    #[serde(default)]
    pub room: Option<RoomRef>,
    #[serde(default)]
    pub room_type: Option<RoomType>,
    #[serde(default)]
    pub room_type_id: Option<String>,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub status: ReservationStatus,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_details: Vec<PaymentDetail>,
    pub source: ReservationSource,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub property_id: Option<String>,
}

impl Reservation {
    /// Number of nights booked (can be zero for malformed records)
    pub fn nights(&self) -> i64 {
        (self.check_out_date.date_naive() - self.check_in_date.date_naive()).num_days()
    }

    /// "2025-03-01 → 2025-03-04" for table cells
    pub fn dates_display(&self) -> String {
        format!(
            "{} → {}",
            self.check_in_date.format("%Y-%m-%d"),
            self.check_out_date.format("%Y-%m-%d")
        )
    }
}

/// Guest identity attached to a reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<GuestAddress>,
}

impl Guest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Optional free-form guest address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestAddress {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Room subset embedded in reservation listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub room_number: String,
    #[serde(default)]
    pub status: String,
}

/// A recorded payment against a reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetail {
    pub amount: f64,
    pub method: String,
    pub transaction_id: String,
    pub date: DateTime<Utc>,
}

/// Lifecycle status of a reservation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationStatus {
    #[default]
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    NoShow,
}

impl ReservationStatus {
    pub fn all() -> &'static [ReservationStatus] {
        &[
            ReservationStatus::Confirmed,
            ReservationStatus::CheckedIn,
            ReservationStatus::CheckedOut,
            ReservationStatus::Cancelled,
            ReservationStatus::NoShow,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::CheckedIn => "checked-in",
            ReservationStatus::CheckedOut => "checked-out",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::NoShow => "no-show",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::CheckedIn => "Checked In",
            ReservationStatus::CheckedOut => "Checked Out",
            ReservationStatus::Cancelled => "Cancelled",
            ReservationStatus::NoShow => "No Show",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment state of a reservation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    PartiallyPaid,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn all() -> &'static [PaymentStatus] {
        &[
            PaymentStatus::Pending,
            PaymentStatus::PartiallyPaid,
            PaymentStatus::Paid,
            PaymentStatus::Refunded,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::PartiallyPaid => "partially_paid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::PartiallyPaid => "Partially Paid",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Refunded => "Refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationSource {
    #[default]
    Direct,
    #[serde(rename = "booking.com")]
    BookingCom,
    Expedia,
    Airbnb,
    Other,
}

impl ReservationSource {
    pub fn all() -> &'static [ReservationSource] {
        &[
            ReservationSource::Direct,
            ReservationSource::BookingCom,
            ReservationSource::Expedia,
            ReservationSource::Airbnb,
            ReservationSource::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationSource::Direct => "direct",
            ReservationSource::BookingCom => "booking.com",
            ReservationSource::Expedia => "expedia",
            ReservationSource::Airbnb => "airbnb",
            ReservationSource::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReservationSource::Direct => "Direct",
            ReservationSource::BookingCom => "Booking.com",
            ReservationSource::Expedia => "Expedia",
            ReservationSource::Airbnb => "Airbnb",
            ReservationSource::Other => "Other",
        }
    }
}

impl fmt::Display for ReservationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// List Filters & Query
// ============================================================================

/// Free-form reservation list filters; empty string means unset.
///
/// Values stay strings all the way to the query pairs, mirroring the form
/// fields that feed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilters {
    pub status: String,
    pub guest: String,
    pub check_in_date: String,
    pub check_out_date: String,
    pub source: String,
    pub room_type: String,
    pub room: String,
}

impl ReservationFilters {
    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// Query pairs in wire naming, omitting empty values
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let all = [
            ("status", &self.status),
            ("guest", &self.guest),
            ("checkInDate", &self.check_in_date),
            ("checkOutDate", &self.check_out_date),
            ("source", &self.source),
            ("roomType", &self.room_type),
            ("room", &self.room),
        ];
        all.into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key, value.clone()))
            .collect()
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Status => &self.status,
            FilterField::Guest => &self.guest,
            FilterField::CheckInDate => &self.check_in_date,
            FilterField::CheckOutDate => &self.check_out_date,
            FilterField::Source => &self.source,
            FilterField::RoomType => &self.room_type,
            FilterField::Room => &self.room,
        }
    }

    pub fn set(&mut self, field: FilterField, value: String) {
        match field {
            FilterField::Status => self.status = value,
            FilterField::Guest => self.guest = value,
            FilterField::CheckInDate => self.check_in_date = value,
            FilterField::CheckOutDate => self.check_out_date = value,
            FilterField::Source => self.source = value,
            FilterField::RoomType => self.room_type = value,
            FilterField::Room => self.room = value,
        }
    }
}

/// One editable filter slot on the inventory page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Status,
    Guest,
    CheckInDate,
    CheckOutDate,
    Source,
    RoomType,
    Room,
}

impl FilterField {
    pub fn all() -> &'static [FilterField] {
        &[
            FilterField::Status,
            FilterField::Guest,
            FilterField::CheckInDate,
            FilterField::CheckOutDate,
            FilterField::Source,
            FilterField::RoomType,
            FilterField::Room,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Status => "Status",
            FilterField::Guest => "Guest",
            FilterField::CheckInDate => "Check-in",
            FilterField::CheckOutDate => "Check-out",
            FilterField::Source => "Source",
            FilterField::RoomType => "Room Type",
            FilterField::Room => "Room",
        }
    }
}

/// Full query for GET /reservations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationQuery {
    pub page: u32,
    pub limit: u32,
    pub property_id: Option<String>,
    pub filters: ReservationFilters,
}

impl Default for ReservationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            property_id: None,
            filters: ReservationFilters::default(),
        }
    }
}

impl ReservationQuery {
    /// All query pairs: page and limit always, propertyId when scoped, then
    /// the non-empty filters
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(property_id) = &self.property_id {
            pairs.push(("propertyId", property_id.clone()));
        }
        pairs.extend(self.filters.pairs());
        pairs
    }
}
