//! # Persistence Layer
//!
//! Storage for quote requests that could not be emailed.
//!
//! ## Port
//!
//! - [`FallbackStore`]: append-only store of [`FallbackRecord`](crate::domain::entities::FallbackRecord)s
//!
//! ## Implementations
//!
//! - [`JsonFileFallbackStore`]: JSON array on local disk
//! - [`InMemoryFallbackStore`]: process-local store for tests

pub mod in_memory;
pub mod json_file;
pub mod traits;

pub use in_memory::InMemoryFallbackStore;
pub use json_file::JsonFileFallbackStore;
pub use traits::{FallbackStore, RecordError, RecordResult};
