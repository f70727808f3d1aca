//! # API Layer
//!
//! - [`rest`]: HTTP endpoints
pub mod rest;
