//! Data models for innboard
//!
//! Wire shapes mirror the REST API (camelCase fields, `_id` identifiers);
//! everything decodes through serde at the client boundary.

pub mod envelope;
pub mod property;
pub mod reservation;
pub mod room;
pub mod room_type;
pub mod task;
pub mod user;

pub use envelope::{ApiEnvelope, Pagination};
pub use property::{Address, GeoPoint, Property};
pub use reservation::{
    FilterField, Guest, GuestAddress, PaymentDetail, PaymentStatus, Reservation,
    ReservationFilters, ReservationQuery, ReservationSource, ReservationStatus, RoomRef,
};
pub use room::{Amenity, Room, RoomImage, RoomStatus, RoomTypeRef, AMENITIES, BED_TYPES};
pub use room_type::RoomType;
pub use task::Task;
pub use user::User;

pub(crate) fn default_true() -> bool {
    true
}
