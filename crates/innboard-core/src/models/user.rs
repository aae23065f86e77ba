//! Authenticated user record
//!
//! The server's user object is treated as opaque beyond a few display
//! fields; everything else is retained untouched.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// Something printable for the account corner of the header
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("account")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_keeps_unknown_fields() {
        let json = r#"{ "_id": "u1", "email": "admin@example.com", "role": "manager" }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.display_name(), "admin@example.com");
        assert_eq!(
            user.extra.get("role").and_then(|v| v.as_str()),
            Some("manager")
        );
    }

    #[test]
    fn test_display_name_fallback() {
        let user = User::default();
        assert_eq!(user.display_name(), "account");
    }
}
