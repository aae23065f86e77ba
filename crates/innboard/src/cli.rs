//! Helpers for the non-interactive subcommands
//!
//! Property resolution and table/JSON formatting shared by the listing
//! commands; the handlers themselves live in main.rs.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use innboard_core::models::room::amenity_label;
use innboard_core::models::{Property, Room, RoomType};
use innboard_core::ReservationPage;

// ============================================================================
// Error Types
// ============================================================================

/// Failures in subcommand plumbing (auth and property lookup)
#[derive(Debug)]
pub enum CliError {
    NotSignedIn,
    NoProperties,
    UnknownProperty {
        wanted: String,
    },
    AmbiguousProperty {
        wanted: String,
        count: usize,
        suggestions: String,
    },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NotSignedIn => {
                write!(f, "Not signed in. Run 'innboard login <email>' first")
            }
            CliError::NoProperties => {
                write!(f, "No properties exist on this account yet")
            }
            CliError::UnknownProperty { wanted } => {
                write!(
                    f,
                    "No property matches '{}' (see 'innboard properties')",
                    wanted
                )
            }
            CliError::AmbiguousProperty {
                wanted,
                count,
                suggestions,
            } => {
                write!(
                    f,
                    "Property '{}' is ambiguous: matches {} properties\n{}",
                    wanted, count, suggestions
                )
            }
        }
    }
}

impl std::error::Error for CliError {}

// ============================================================================
// Property Selection
// ============================================================================

/// Pick the property a listing command works on.
///
/// Without `--property` the first property wins, matching the TUI's default
/// selection. With it: exact id, then case-insensitive exact name, then a
/// unique id or name prefix.
pub fn resolve_property<'a>(
    properties: &'a [Property],
    wanted: Option<&str>,
) -> Result<&'a Property, CliError> {
    if properties.is_empty() {
        return Err(CliError::NoProperties);
    }
    let Some(wanted) = wanted else {
        return Ok(&properties[0]);
    };

    if let Some(property) = properties.iter().find(|p| p.id == wanted) {
        return Ok(property);
    }

    let wanted_lower = wanted.to_lowercase();
    if let Some(property) = properties
        .iter()
        .find(|p| p.name.to_lowercase() == wanted_lower)
    {
        return Ok(property);
    }

    let matches: Vec<&Property> = properties
        .iter()
        .filter(|p| p.id.starts_with(wanted) || p.name.to_lowercase().starts_with(&wanted_lower))
        .collect();

    match matches.len() {
        0 => Err(CliError::UnknownProperty {
            wanted: wanted.to_string(),
        }),
        1 => Ok(matches[0]),
        count => {
            let suggestions = matches
                .iter()
                .take(5)
                .map(|p| format!("  - {} ({})", p.name, p.id))
                .collect::<Vec<_>>()
                .join("\n");
            Err(CliError::AmbiguousProperty {
                wanted: wanted.to_string(),
                count,
                suggestions,
            })
        }
    }
}

// ============================================================================
// Input Helpers
// ============================================================================

/// Check a `--check-in`/`--check-out` value before it reaches the server
pub fn validate_date(s: &str) -> Result<()> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|_| ())
        .with_context(|| format!("'{s}' is not a YYYY-MM-DD date"))
}

/// Read the login password when `INNBOARD_PASSWORD` is not set.
///
/// Plain line read; the prompt goes to stderr so piped stdout stays clean.
pub fn prompt_password() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }
    Ok(password)
}

// ============================================================================
// Formatters
// ============================================================================

/// Shared table skeleton: dynamic column widths, cyan headers unless colors
/// are off
fn base_table(headers: &[&str], no_color: bool) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if no_color {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
    table
}

/// Format properties as a table (human) or JSON array
pub fn format_property_table(properties: &[Property], json: bool, no_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(properties).unwrap_or_else(|_| "[]".to_string());
    }

    if properties.is_empty() {
        return "No properties found.".to_string();
    }

    let mut table = base_table(
        &["ID", "Name", "Address", "Email", "Website", "Active"],
        no_color,
    );
    for property in properties {
        table.add_row(Row::from(vec![
            property.id.clone(),
            property.name.clone(),
            truncate(&property.address_display(), 40),
            property.email.clone(),
            truncate(&property.website, 30),
            active_mark(property.is_active).to_string(),
        ]));
    }

    table.to_string()
}

/// Format rooms as a table (human) or JSON array. `room_types` resolves
/// type names when the server returns bare ids.
pub fn format_room_table(
    rooms: &[Room],
    room_types: &[RoomType],
    json: bool,
    no_color: bool,
) -> String {
    if json {
        return serde_json::to_string_pretty(rooms).unwrap_or_else(|_| "[]".to_string());
    }

    if rooms.is_empty() {
        return "No rooms found.".to_string();
    }

    let mut table = base_table(
        &["Room", "Type", "Floor", "Status", "Beds", "Amenities", "Active"],
        no_color,
    );
    for room in rooms {
        let type_name = room
            .room_type
            .name()
            .map(str::to_string)
            .or_else(|| {
                room_types
                    .iter()
                    .find(|rt| rt.id == room.room_type_id())
                    .map(|rt| rt.name.clone())
            })
            .unwrap_or_else(|| "-".to_string());
        let amenities = room
            .amenities
            .iter()
            .map(|id| amenity_label(id))
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row(Row::from(vec![
            room.room_number.clone(),
            type_name,
            room.floor.to_string(),
            room.status.label().to_string(),
            room.bed_type.clone(),
            truncate(&amenities, 40),
            active_mark(room.is_active).to_string(),
        ]));
    }

    table.to_string()
}

/// Format room types as a table (human) or JSON array
pub fn format_room_type_table(room_types: &[RoomType], json: bool, no_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(room_types).unwrap_or_else(|_| "[]".to_string());
    }

    if room_types.is_empty() {
        return "No room types found.".to_string();
    }

    let mut table = base_table(&["Name", "Base rate", "Capacity", "Description"], no_color);
    for room_type in room_types {
        table.add_row(Row::from(vec![
            room_type.name.clone(),
            room_type.rate_display(),
            format!("{} guests", room_type.capacity),
            room_type
                .description
                .as_deref()
                .map(|d| truncate(d, 40))
                .unwrap_or_else(|| "-".to_string()),
        ]));
    }

    table.to_string()
}

/// Format one reservation page as a table (human) or a JSON object carrying
/// the pagination block
pub fn format_reservation_table(page: &ReservationPage, json: bool, no_color: bool) -> String {
    if json {
        let body = serde_json::json!({
            "items": page.items,
            "total": page.pagination.map(|p| p.total).or(page.count),
            "page": page.pagination.map(|p| p.page),
            "pages": page.pagination.map(|p| p.pages),
        });
        return serde_json::to_string_pretty(&body).unwrap_or_else(|_| "{}".to_string());
    }

    if page.items.is_empty() {
        return "No reservations match the current filters.".to_string();
    }

    let mut table = base_table(
        &["Res #", "Guest", "Dates", "Nights", "Status", "Total", "Payment", "Source"],
        no_color,
    );
    for reservation in &page.items {
        table.add_row(Row::from(vec![
            reservation.reservation_number.clone(),
            truncate(&reservation.guest.full_name(), 25),
            reservation.dates_display(),
            reservation.nights().to_string(),
            reservation.status.label().to_string(),
            format!("${:.2}", reservation.total_amount),
            reservation.payment_status.label().to_string(),
            reservation.source.label().to_string(),
        ]));
    }

    table.to_string()
}

/// Resolved page position for the footer line, falling back to the request
/// when the server omitted its pagination block
pub fn page_summary(page: &ReservationPage, requested: u32) -> (u32, u32, u64) {
    match page.pagination {
        Some(p) => (p.page, p.pages.max(1), p.total),
        None => (
            requested,
            1,
            page.count.unwrap_or(page.items.len() as u64),
        ),
    }
}

// ============================================================================
// Utilities
// ============================================================================

fn active_mark(active: bool) -> &'static str {
    if active {
        "yes"
    } else {
        "no"
    }
}

fn truncate(s: &str, max: usize) -> String {
    let chars = s.chars().count();
    if chars <= max {
        s.to_string()
    } else {
        // Char-based so multi-byte input cannot split a code point
        s.chars().take(max - 1).collect::<String>() + "…"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use innboard_core::models::{
        Address, Guest, Pagination, PaymentStatus, Reservation, ReservationSource,
        ReservationStatus, RoomStatus, RoomTypeRef,
    };

    fn property(id: &str, name: &str) -> Property {
        Property {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            address: Address {
                street: "1 Main St".to_string(),
                city: "Brighton".to_string(),
                ..Address::default()
            },
            email: format!("{id}@example.com"),
            website: String::new(),
            is_active: true,
            location: None,
        }
    }

    fn room(number: &str) -> Room {
        Room {
            id: format!("room-{number}"),
            room_number: number.to_string(),
            property_id: "p1".to_string(),
            room_type: RoomTypeRef::Id("rt1".to_string()),
            floor: 2,
            status: RoomStatus::Available,
            bed_type: "queen".to_string(),
            description: None,
            notes: None,
            amenities: vec!["minibar".to_string()],
            is_active: true,
            last_cleaned: None,
            images: Vec::new(),
        }
    }

    fn room_type(id: &str, name: &str) -> RoomType {
        RoomType {
            id: id.to_string(),
            name: name.to_string(),
            description: Some("Street-facing double with a desk".to_string()),
            base_rate: 120.0,
            capacity: 2,
            amenities: Vec::new(),
            images: Vec::new(),
            property_id: Some("p1".to_string()),
        }
    }

    fn reservation(number: &str) -> Reservation {
        Reservation {
            id: format!("res-{number}"),
            reservation_number: number.to_string(),
            guest: Guest {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: None,
                address: None,
            },
            room: None,
            room_type: None,
            room_type_id: None,
            check_in_date: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            check_out_date: Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap(),
            status: ReservationStatus::Confirmed,
            total_amount: 420.0,
            payment_status: PaymentStatus::Pending,
            payment_details: Vec::new(),
            source: ReservationSource::Direct,
            source_id: None,
            special_requests: None,
            notes: None,
            property_id: Some("p1".to_string()),
        }
    }

    #[test]
    fn test_resolve_property_defaults_to_first() {
        let properties = vec![property("p1", "Seaside Inn"), property("p2", "Hill Lodge")];
        let found = resolve_property(&properties, None).unwrap();
        assert_eq!(found.id, "p1");
    }

    #[test]
    fn test_resolve_property_by_id() {
        let properties = vec![property("p1", "Seaside Inn"), property("p2", "Hill Lodge")];
        let found = resolve_property(&properties, Some("p2")).unwrap();
        assert_eq!(found.name, "Hill Lodge");
    }

    #[test]
    fn test_resolve_property_by_name_case_insensitive() {
        let properties = vec![property("p1", "Seaside Inn"), property("p2", "Hill Lodge")];
        let found = resolve_property(&properties, Some("hill lodge")).unwrap();
        assert_eq!(found.id, "p2");
    }

    #[test]
    fn test_resolve_property_by_unique_prefix() {
        let properties = vec![property("p1", "Seaside Inn"), property("p2", "Hill Lodge")];
        let found = resolve_property(&properties, Some("Sea")).unwrap();
        assert_eq!(found.id, "p1");
    }

    #[test]
    fn test_resolve_property_ambiguous_prefix() {
        let properties = vec![
            property("p1", "Seaside Inn"),
            property("p2", "Seaside Annex"),
        ];
        let result = resolve_property(&properties, Some("Seaside"));
        assert!(matches!(
            result,
            Err(CliError::AmbiguousProperty { count: 2, .. })
        ));
    }

    #[test]
    fn test_resolve_property_unknown() {
        let properties = vec![property("p1", "Seaside Inn")];
        let result = resolve_property(&properties, Some("Mountain"));
        assert!(matches!(result, Err(CliError::UnknownProperty { .. })));
    }

    #[test]
    fn test_resolve_property_empty_list() {
        let result = resolve_property(&[], None);
        assert!(matches!(result, Err(CliError::NoProperties)));
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2026-03-01").is_ok());
        assert!(validate_date("03/01/2026").is_err());
        assert!(validate_date("2026-3-1x").is_err());
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello world", 20), "hello world");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("café corner", 6), "café …");
        assert_eq!(truncate("ほそ道", 10), "ほそ道");
        assert_eq!(truncate("ほそ道をゆく", 4), "ほそ道…");
    }

    #[test]
    fn test_format_property_table_empty() {
        let output = format_property_table(&[], false, false);
        assert!(output.contains("No properties found"));
    }

    #[test]
    fn test_format_property_table_json() {
        let properties = vec![property("p1", "Seaside Inn")];
        let output = format_property_table(&properties, true, false);
        assert!(output.starts_with('['));
        assert!(output.contains("Seaside Inn"));
    }

    #[test]
    fn test_format_room_table_resolves_type_name() {
        let rooms = vec![room("101")];
        let room_types = vec![room_type("rt1", "Standard Double")];
        let output = format_room_table(&rooms, &room_types, false, false);
        assert!(output.contains("101"));
        assert!(output.contains("Standard Double"));
        // Amenity ids render as labels
        assert!(output.contains("Minibar"));
    }

    #[test]
    fn test_format_room_type_table_plain() {
        let room_types = vec![room_type("rt1", "Standard Double")];
        let output = format_room_type_table(&room_types, false, true);
        assert!(output.contains("Standard Double"));
        assert!(output.contains("$120.00"));
        assert!(output.contains("2 guests"));
    }

    #[test]
    fn test_format_reservation_table_json_carries_pagination() {
        let page = ReservationPage {
            items: vec![reservation("RES-1001")],
            count: Some(1),
            pagination: Some(Pagination {
                total: 57,
                page: 2,
                pages: 3,
            }),
        };
        let output = format_reservation_table(&page, true, false);
        assert!(output.starts_with('{'));
        assert!(output.contains("RES-1001"));
        assert!(output.contains("\"total\": 57"));
    }

    #[test]
    fn test_page_summary_prefers_server_block() {
        let page = ReservationPage {
            items: vec![reservation("RES-1001")],
            count: Some(1),
            pagination: Some(Pagination {
                total: 57,
                page: 2,
                pages: 3,
            }),
        };
        assert_eq!(page_summary(&page, 9), (2, 3, 57));
    }

    #[test]
    fn test_page_summary_without_pagination() {
        let page = ReservationPage {
            items: vec![reservation("RES-1001"), reservation("RES-1002")],
            count: None,
            pagination: None,
        };
        assert_eq!(page_summary(&page, 1), (1, 1, 2));
    }
}
