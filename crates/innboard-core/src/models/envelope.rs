//! Response envelope shared by all non-auth endpoints

use serde::Deserialize;

/// Standard `{ success, data, ... }` wrapper.
///
/// `success` must be checked explicitly: the server reports application
/// failures inside a 200 response. Most endpoints put the failure text in
/// `error`, the room-type endpoints use `message`; both are accepted.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl<T> ApiEnvelope<T> {
    /// Failure text, preferring `error` over `message`
    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

/// Pagination block on list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub pages: u32,
}
