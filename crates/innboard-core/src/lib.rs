//! innboard-core - Core library for innboard
//!
//! Provides the API client, session and property stores, page controllers,
//! and form validation for the property-management admin.

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod models;
pub mod pages;
pub mod property;
pub mod session;
pub mod validation;

pub use client::{ApiClient, LoginResponse, ReservationPage};
pub use config::ApiConfig;
pub use error::CoreError;
pub use event::{DataEvent, EventBus, Notice, NoticeLevel};
pub use property::PropertyStore;
pub use session::{SessionPhase, SessionStore};
