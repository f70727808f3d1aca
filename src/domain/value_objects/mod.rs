//! # Value Objects
//!
//! Immutable types with domain semantics.
//!
//! - [`BookingId`]: human-readable request identifier, and the
//!   [`BookingIdGenerator`] that issues it
//! - [`Timestamp`]: UTC point in time
//! - [`BusinessProfile`]: public contact details of the operator

pub mod booking_id;
pub mod business_profile;
pub mod timestamp;

pub use booking_id::{BookingId, BookingIdGenerator, DEFAULT_BOOKING_PREFIX};
pub use business_profile::BusinessProfile;
pub use timestamp::Timestamp;
