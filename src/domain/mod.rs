//! # Domain Layer
//!
//! Pure types and rules for quote intake. Nothing in here performs I/O.
//!
//! - [`entities`]: quote requests, notifications and fallback records
//! - [`value_objects`]: booking IDs and timestamps
//! - [`services`]: validation and notification composition
//! - [`errors`]: validation failures

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
