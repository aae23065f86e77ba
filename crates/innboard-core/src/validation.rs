//! Form schemas and structured validation results
//!
//! Every form validates into a typed payload before anything touches the
//! network: `to_payload()` on the page forms returns either the request body
//! or a [`FieldErrors`] map keyed by dotted field path ("guest.email").
//! Validation failures never reach the server.

use crate::models::{PaymentStatus, ReservationSource, ReservationStatus, RoomStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

// ============================================================================
// Field Errors
// ============================================================================

/// Per-field validation messages, keyed by dotted field path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the first message recorded for a field
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fold into Ok when empty, Err otherwise
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        flatten_into("", &errors, &mut out);
        out
    }
}

fn flatten_into(prefix: &str, errors: &ValidationErrors, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(first) = list.first() {
                    let message = first
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| first.code.to_string());
                    out.insert(path, message);
                }
            }
            ValidationErrorsKind::Struct(nested) => flatten_into(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten_into(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

/// Run a derived validator and flatten the outcome
pub fn check<T: Validate>(payload: &T) -> Result<(), FieldErrors> {
    payload.validate().map_err(FieldErrors::from)
}

// ============================================================================
// Date helpers
// ============================================================================

/// Parse a form date field ("YYYY-MM-DD")
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Midnight UTC for a form date, the precision the API stores
pub fn date_to_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

// ============================================================================
// Payloads (request bodies, validated before submission)
// ============================================================================

/// POST /auth/login body
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginPayload {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Invalid email address")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// POST/PUT /properties body
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPayload {
    #[validate(length(min = 1, message = "Property name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(nested)]
    pub address: AddressPayload,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Invalid email address")
    )]
    pub email: String,
    #[validate(
        length(min = 1, message = "Website is required"),
        url(message = "Invalid URL")
    )]
    pub website: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    #[validate(length(min = 1, message = "Street address is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "ZIP code is required"))]
    pub zip_code: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
}

/// POST/PUT /rooms body
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    #[validate(length(min = 1, message = "Room number is required"))]
    pub room_number: String,
    #[validate(length(min = 1, message = "Property is required"))]
    pub property_id: String,
    #[validate(length(min = 1, message = "Room type is required"))]
    pub room_type: String,
    pub floor: i32,
    pub status: RoomStatus,
    #[validate(length(min = 1, message = "Bed type is required"))]
    pub bed_type: String,
    pub description: String,
    pub notes: String,
    pub amenities: Vec<String>,
    pub is_active: bool,
}

/// POST/PUT /room-types body
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypePayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: String,
    #[validate(range(min = 0.0, message = "Base rate must be positive"))]
    pub base_rate: f64,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: u32,
    #[validate(length(min = 1, message = "Property is required"))]
    pub property_id: String,
}

/// POST/PUT /reservations body
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPayload {
    #[validate(length(min = 1, message = "Reservation number is required"))]
    pub reservation_number: String,
    #[validate(nested)]
    pub guest: GuestPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_type_id: Option<String>,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub status: ReservationStatus,
    #[validate(range(min = 0.0, message = "Total amount cannot be negative"))]
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    pub source: ReservationSource,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub special_requests: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[validate(length(min = 1, message = "Property is required"))]
    pub property_id: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GuestPayload {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Invalid email")
    )]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_property() -> PropertyPayload {
        PropertyPayload {
            name: "Seaside Inn".to_string(),
            description: "Beachfront".to_string(),
            address: AddressPayload {
                street: "1 Ocean Dr".to_string(),
                city: "Brighton".to_string(),
                state: "East Sussex".to_string(),
                zip_code: "BN1".to_string(),
                country: "UK".to_string(),
            },
            email: "hello@seaside.example".to_string(),
            website: "https://seaside.example".to_string(),
        }
    }

    #[test]
    fn test_valid_property_passes() {
        assert!(check(&valid_property()).is_ok());
    }

    #[test]
    fn test_property_field_messages() {
        let mut payload = valid_property();
        payload.name = String::new();
        payload.email = "not-an-email".to_string();
        let errors = check(&payload).unwrap_err();
        assert_eq!(errors.get("name"), Some("Property name is required"));
        assert_eq!(errors.get("email"), Some("Invalid email address"));
    }

    #[test]
    fn test_nested_address_paths() {
        let mut payload = valid_property();
        payload.address.city = String::new();
        payload.address.country = String::new();
        let errors = check(&payload).unwrap_err();
        assert_eq!(errors.get("address.city"), Some("City is required"));
        assert_eq!(errors.get("address.country"), Some("Country is required"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_website_must_be_url() {
        let mut payload = valid_property();
        payload.website = "nota url".to_string();
        let errors = check(&payload).unwrap_err();
        assert_eq!(errors.get("website"), Some("Invalid URL"));
    }

    #[test]
    fn test_room_type_bounds() {
        let payload = RoomTypePayload {
            name: "Deluxe".to_string(),
            description: String::new(),
            base_rate: -5.0,
            capacity: 0,
            property_id: "p1".to_string(),
        };
        let errors = check(&payload).unwrap_err();
        assert_eq!(errors.get("base_rate"), Some("Base rate must be positive"));
        assert_eq!(errors.get("capacity"), Some("Capacity must be at least 1"));
    }

    #[test]
    fn test_guest_email_nested_path() {
        let payload = ReservationPayload {
            reservation_number: "RSV-1".to_string(),
            guest: GuestPayload {
                first_name: "Ada".to_string(),
                last_name: "Byrne".to_string(),
                email: "bad".to_string(),
                phone: String::new(),
            },
            room_type_id: None,
            check_in_date: date_to_utc(parse_date("2025-03-01").unwrap()),
            check_out_date: date_to_utc(parse_date("2025-03-04").unwrap()),
            status: ReservationStatus::Confirmed,
            total_amount: 100.0,
            payment_status: PaymentStatus::Pending,
            source: ReservationSource::Direct,
            special_requests: String::new(),
            notes: String::new(),
            property_id: "p1".to_string(),
        };
        let errors = check(&payload).unwrap_err();
        assert_eq!(errors.get("guest.email"), Some("Invalid email"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-01"),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
        assert_eq!(parse_date(" 2025-03-01 "), NaiveDate::from_ymd_opt(2025, 3, 1));
        assert!(parse_date("03/01/2025").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_payload_serializes_camel_case() {
        let payload = RoomTypePayload {
            name: "Deluxe".to_string(),
            description: String::new(),
            base_rate: 100.0,
            capacity: 2,
            property_id: "p1".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["baseRate"], 100.0);
        assert_eq!(json["propertyId"], "p1");
    }

    #[test]
    fn test_field_errors_keep_first_message() {
        let mut errors = FieldErrors::new();
        errors.insert("name", "first");
        errors.insert("name", "second");
        assert_eq!(errors.get("name"), Some("first"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_login_requires_both_fields() {
        let payload = LoginPayload {
            email: String::new(),
            password: String::new(),
        };
        let errors = check(&payload).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));

        let payload = LoginPayload {
            email: "not-an-email".to_string(),
            password: "x".to_string(),
        };
        let errors = check(&payload).unwrap_err();
        assert_eq!(errors.get("email"), Some("Invalid email address"));
        assert!(errors.get("password").is_none());
    }
}
