//! Room model plus the fixed bed-type and amenity catalogs

use super::room_type::RoomType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A physical room belonging to exactly one property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "_id")]
    pub id: String,
    pub room_number: String,
    #[serde(default)]
    pub property_id: String,
    pub room_type: RoomTypeRef,
    #[serde(default = "default_floor")]
    pub floor: i32,
    #[serde(default)]
    pub status: RoomStatus,
    #[serde(default)]
    pub bed_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default = "super::default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub last_cleaned: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<RoomImage>,
}

fn default_floor() -> i32 {
    1
}

impl Room {
    /// Room-type id regardless of whether the server embedded the object
    pub fn room_type_id(&self) -> &str {
        self.room_type.id()
    }
}

/// Room type reference: some endpoints return the id, others embed the object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoomTypeRef {
    Id(String),
    Embedded(Box<RoomType>),
}

impl RoomTypeRef {
    pub fn id(&self) -> &str {
        match self {
            RoomTypeRef::Id(id) => id,
            RoomTypeRef::Embedded(rt) => &rt.id,
        }
    }

    /// Name when the object was embedded
    pub fn name(&self) -> Option<&str> {
        match self {
            RoomTypeRef::Id(_) => None,
            RoomTypeRef::Embedded(rt) => Some(&rt.name),
        }
    }
}

/// Room image attachment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomImage {
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Operational status of a room
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Available,
    Occupied,
    Maintenance,
    Cleaning,
}

impl RoomStatus {
    pub fn all() -> &'static [RoomStatus] {
        &[
            RoomStatus::Available,
            RoomStatus::Occupied,
            RoomStatus::Maintenance,
            RoomStatus::Cleaning,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
            RoomStatus::Cleaning => "cleaning",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoomStatus::Available => "Available",
            RoomStatus::Occupied => "Occupied",
            RoomStatus::Maintenance => "Maintenance",
            RoomStatus::Cleaning => "Cleaning",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bed types offered in the room form
pub const BED_TYPES: &[&str] = &[
    "king",
    "queen",
    "double",
    "single",
    "twin",
    "twin_xl",
    "california_king",
];

/// A toggleable room feature tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amenity {
    pub id: &'static str,
    pub label: &'static str,
}

/// Fixed amenity catalog offered as toggles on the room form
pub const AMENITIES: &[Amenity] = &[
    Amenity { id: "ac", label: "AC" },
    Amenity { id: "shower", label: "Shower" },
    Amenity { id: "smoking", label: "Smoking" },
    Amenity { id: "tv", label: "TV" },
    Amenity { id: "bathtub", label: "Bath tub" },
    Amenity { id: "balcony", label: "Balcony" },
    Amenity { id: "airPurifier", label: "Air purifier" },
    Amenity { id: "electricKettle", label: "Electric kettle" },
    Amenity { id: "heater", label: "Heater" },
    Amenity { id: "inRoomDining", label: "In room dining" },
    Amenity { id: "minibar", label: "Minibar" },
    Amenity { id: "coupleFriendly", label: "Couple Friendly" },
    Amenity { id: "hairDryer", label: "Hair Dryer" },
    Amenity { id: "microwave", label: "Microwave" },
    Amenity { id: "fridge", label: "Fridge" },
    Amenity { id: "iron", label: "Iron" },
];

/// Display label for an amenity id, falling back to the raw id
pub fn amenity_label(id: &str) -> &str {
    AMENITIES
        .iter()
        .find(|a| a.id == id)
        .map(|a| a.label)
        .unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_room_with_type_id() {
        let json = r#"{
            "_id": "r1",
            "roomNumber": "101",
            "propertyId": "p1",
            "roomType": "rt1",
            "floor": 2,
            "status": "occupied",
            "bedType": "queen",
            "amenities": ["ac", "tv"],
            "isActive": true
        }"#;
        let room: Room = serde_json::from_str(json).unwrap();
        assert_eq!(room.room_type_id(), "rt1");
        assert_eq!(room.status, RoomStatus::Occupied);
        assert_eq!(room.room_type.name(), None);
    }

    #[test]
    fn test_decode_room_with_embedded_type() {
        let json = r#"{
            "_id": "r2",
            "roomNumber": "102",
            "roomType": { "_id": "rt2", "name": "Deluxe", "baseRate": 120.0, "capacity": 2 }
        }"#;
        let room: Room = serde_json::from_str(json).unwrap();
        assert_eq!(room.room_type_id(), "rt2");
        assert_eq!(room.room_type.name(), Some("Deluxe"));
        assert_eq!(room.floor, 1);
        assert_eq!(room.status, RoomStatus::Available);
        assert!(room.is_active);
    }

    #[test]
    fn test_status_round_trip() {
        for status in RoomStatus::all() {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: RoomStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *status);
        }
    }

    #[test]
    fn test_amenity_label_lookup() {
        assert_eq!(amenity_label("coupleFriendly"), "Couple Friendly");
        assert_eq!(amenity_label("sauna"), "sauna");
    }
}
