//! # Infrastructure Layer
//!
//! Adapters to the outside world.
//!
//! - [`mail`]: SMTP delivery with an ordered chain of transport strategies
//! - [`persistence`]: the fallback store for undelivered requests

pub mod mail;
pub mod persistence;
