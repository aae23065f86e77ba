//! Typed HTTP client for the property-management REST API
//!
//! All traffic goes through [`ApiClient`]: one `reqwest::Client` with a
//! request timeout, a shared bearer-token slot, and per-endpoint typed
//! methods. Responses are decoded at this boundary; nothing above it ever
//! sees raw JSON.
//!
//! The `/auth/*` endpoints answer with bare objects; everything else wraps
//! its payload in [`ApiEnvelope`] and reports application failures inside a
//! 200 response, so `success` is checked here as well as the HTTP status.

use crate::config::ApiConfig;
use crate::error::CoreError;
use crate::models::{
    ApiEnvelope, Pagination, Property, Reservation, ReservationQuery, Room, RoomType, User,
};
use crate::validation::{PropertyPayload, ReservationPayload, RoomPayload, RoomTypePayload};
use parking_lot::RwLock;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Successful `POST /auth/login` body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// `GET /auth/validate` body
#[derive(Debug, Deserialize)]
struct ValidateResponse {
    user: User,
}

/// One page of reservations plus the server's pagination block
#[derive(Debug, Clone, Default)]
pub struct ReservationPage {
    pub items: Vec<Reservation>,
    pub count: Option<u64>,
    pub pagination: Option<Pagination>,
}

/// Typed API client, shared via `Arc` across stores and controllers
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CoreError::InvalidConfig {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the bearer token used for subsequent requests
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token if one is set. The returned flag records
    /// whether the request was authenticated, which decides how a 401 is
    /// classified later.
    fn apply_auth(&self, builder: RequestBuilder) -> (RequestBuilder, bool) {
        match self.token.read().as_deref() {
            Some(token) => (builder.bearer_auth(token), true),
            None => (builder, false),
        }
    }

    // ========================================================================
    // Request plumbing
    // ========================================================================

    async fn read_body(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
        authed: bool,
    ) -> Result<String, CoreError> {
        tracing::debug!(endpoint, "sending request");
        let response = builder.send().await.map_err(|source| CoreError::Http {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| CoreError::Http {
            endpoint: endpoint.to_string(),
            source,
        })?;

        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "request failed");
            return Err(error_from_failure(status, &body, authed));
        }
        Ok(body)
    }

    /// Decode an enveloped response, turning `success: false` into an error
    async fn send_envelope<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
        authed: bool,
    ) -> Result<ApiEnvelope<T>, CoreError> {
        let body = self.read_body(builder, endpoint, authed).await?;
        let envelope: ApiEnvelope<T> =
            serde_json::from_str(&body).map_err(|source| decode_error(endpoint, &body, source))?;

        if !envelope.success {
            return Err(CoreError::Api {
                message: envelope
                    .error_text()
                    .unwrap_or("Request failed")
                    .to_string(),
            });
        }
        Ok(envelope)
    }

    /// Decode a bare (non-enveloped) response, as the auth endpoints return
    async fn send_raw<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
        authed: bool,
    ) -> Result<T, CoreError> {
        let body = self.read_body(builder, endpoint, authed).await?;
        serde_json::from_str(&body).map_err(|source| decode_error(endpoint, &body, source))
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, CoreError> {
        let mut builder = self.http.get(self.url(endpoint));
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let (builder, authed) = self.apply_auth(builder);
        let envelope = self.send_envelope::<T>(builder, endpoint, authed).await?;
        envelope.data.ok_or_else(|| CoreError::MissingData {
            endpoint: endpoint.to_string(),
        })
    }

    async fn post_data<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, CoreError> {
        let (builder, authed) = self.apply_auth(self.http.post(self.url(endpoint)).json(body));
        let envelope = self.send_envelope::<T>(builder, endpoint, authed).await?;
        envelope.data.ok_or_else(|| CoreError::MissingData {
            endpoint: endpoint.to_string(),
        })
    }

    async fn put_data<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, CoreError> {
        let (builder, authed) = self.apply_auth(self.http.put(self.url(endpoint)).json(body));
        let envelope = self.send_envelope::<T>(builder, endpoint, authed).await?;
        envelope.data.ok_or_else(|| CoreError::MissingData {
            endpoint: endpoint.to_string(),
        })
    }

    /// DELETE endpoints return an envelope with no meaningful payload
    async fn delete_at(&self, endpoint: &str) -> Result<(), CoreError> {
        let (builder, authed) = self.apply_auth(self.http.delete(self.url(endpoint)));
        self.send_envelope::<serde_json::Value>(builder, endpoint, authed)
            .await?;
        Ok(())
    }

    // ========================================================================
    // Auth
    // ========================================================================

    /// `POST /auth/login`. Does not store the token; session handling owns
    /// that.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, CoreError> {
        let endpoint = "/auth/login";
        let body = json!({ "email": email, "password": password });
        let (builder, authed) = self.apply_auth(self.http.post(self.url(endpoint)).json(&body));
        self.send_raw(builder, endpoint, authed).await
    }

    /// `GET /auth/validate`, confirming the current token still works
    pub async fn validate(&self) -> Result<User, CoreError> {
        let endpoint = "/auth/validate";
        let (builder, authed) = self.apply_auth(self.http.get(self.url(endpoint)));
        let response: ValidateResponse = self.send_raw(builder, endpoint, authed).await?;
        Ok(response.user)
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// `GET /properties`. Tolerates both the enveloped shape and a bare
    /// array body, which older deployments of the API return.
    pub async fn list_properties(&self) -> Result<Vec<Property>, CoreError> {
        let endpoint = "/properties";
        let (builder, authed) = self.apply_auth(self.http.get(self.url(endpoint)));
        let body = self.read_body(builder, endpoint, authed).await?;

        if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<Vec<Property>>>(&body) {
            if !envelope.success {
                return Err(CoreError::Api {
                    message: envelope
                        .error_text()
                        .unwrap_or("Request failed")
                        .to_string(),
                });
            }
            return envelope.data.ok_or_else(|| CoreError::MissingData {
                endpoint: endpoint.to_string(),
            });
        }

        serde_json::from_str::<Vec<Property>>(&body)
            .map_err(|source| decode_error(endpoint, &body, source))
    }

    pub async fn create_property(&self, payload: &PropertyPayload) -> Result<Property, CoreError> {
        self.post_data("/properties", payload).await
    }

    // ========================================================================
    // Rooms
    // ========================================================================

    pub async fn list_rooms(&self, property_id: Option<&str>) -> Result<Vec<Room>, CoreError> {
        let query: Vec<(&str, String)> = property_id
            .map(|id| vec![("propertyId", id.to_string())])
            .unwrap_or_default();
        self.get_data("/rooms", &query).await
    }

    pub async fn create_room(&self, payload: &RoomPayload) -> Result<Room, CoreError> {
        self.post_data("/rooms", payload).await
    }

    pub async fn update_room(&self, id: &str, payload: &RoomPayload) -> Result<Room, CoreError> {
        self.put_data(&format!("/rooms/{id}"), payload).await
    }

    pub async fn delete_room(&self, id: &str) -> Result<(), CoreError> {
        self.delete_at(&format!("/rooms/{id}")).await
    }

    // ========================================================================
    // Room types
    // ========================================================================

    pub async fn list_room_types(
        &self,
        property_id: Option<&str>,
    ) -> Result<Vec<RoomType>, CoreError> {
        let query: Vec<(&str, String)> = property_id
            .map(|id| vec![("propertyId", id.to_string())])
            .unwrap_or_default();
        self.get_data("/room-types", &query).await
    }

    pub async fn create_room_type(&self, payload: &RoomTypePayload) -> Result<RoomType, CoreError> {
        self.post_data("/room-types", payload).await
    }

    pub async fn update_room_type(
        &self,
        id: &str,
        payload: &RoomTypePayload,
    ) -> Result<RoomType, CoreError> {
        self.put_data(&format!("/room-types/{id}"), payload).await
    }

    pub async fn delete_room_type(&self, id: &str) -> Result<(), CoreError> {
        self.delete_at(&format!("/room-types/{id}")).await
    }

    // ========================================================================
    // Reservations
    // ========================================================================

    /// `GET /reservations` with pagination and the active filters. Only
    /// non-empty filters become query parameters.
    pub async fn list_reservations(
        &self,
        query: &ReservationQuery,
    ) -> Result<ReservationPage, CoreError> {
        let endpoint = "/reservations";
        let pairs = query.pairs();
        let (builder, authed) =
            self.apply_auth(self.http.get(self.url(endpoint)).query(&pairs));
        let envelope = self
            .send_envelope::<Vec<Reservation>>(builder, endpoint, authed)
            .await?;

        let items = envelope.data.ok_or_else(|| CoreError::MissingData {
            endpoint: endpoint.to_string(),
        })?;
        Ok(ReservationPage {
            items,
            count: envelope.count,
            pagination: envelope.pagination,
        })
    }

    pub async fn create_reservation(
        &self,
        payload: &ReservationPayload,
    ) -> Result<Reservation, CoreError> {
        self.post_data("/reservations", payload).await
    }

    pub async fn update_reservation(
        &self,
        id: &str,
        payload: &ReservationPayload,
    ) -> Result<Reservation, CoreError> {
        self.put_data(&format!("/reservations/{id}"), payload).await
    }

    pub async fn delete_reservation(&self, id: &str) -> Result<(), CoreError> {
        self.delete_at(&format!("/reservations/{id}")).await
    }
}

/// Classify a non-2xx response.
///
/// A 401 on an authenticated request means the session died; a 401 on an
/// unauthenticated one (login) is an ordinary application failure whose
/// server message should be shown to the user.
fn error_from_failure(status: StatusCode, body: &str, authed: bool) -> CoreError {
    if status == StatusCode::UNAUTHORIZED && authed {
        return CoreError::Unauthorized;
    }

    #[derive(Deserialize)]
    struct WireError {
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        message: Option<String>,
    }

    let message = serde_json::from_str::<WireError>(body)
        .ok()
        .and_then(|wire| wire.error.or(wire.message))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

    CoreError::Api { message }
}

fn decode_error(endpoint: &str, body: &str, source: serde_json::Error) -> CoreError {
    CoreError::Decode {
        endpoint: endpoint.to_string(),
        message: format!("unexpected response shape: {}", snippet(body)),
        source: Some(source),
    }
}

/// First part of a response body, for error messages
fn snippet(body: &str) -> String {
    const MAX: usize = 120;
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX).collect();
        format!("{}...", cut)
    }
}
