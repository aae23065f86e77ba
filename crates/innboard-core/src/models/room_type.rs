//! Room type: a rate/capacity category shared by many rooms

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub base_rate: f64,
    pub capacity: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub property_id: Option<String>,
}

impl RoomType {
    /// Base rate formatted for tables
    pub fn rate_display(&self) -> String {
        format!("${:.2}", self.base_rate)
    }
}
