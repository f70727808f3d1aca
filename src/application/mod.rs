//! # Application Layer
//!
//! Use cases that tie validation, composition, delivery and the fallback
//! store together.
//!
//! - [`services`]: quote submission and fallback recording
//! - [`error`]: wiring and operator command errors

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
