//! # Booking Identifiers
//!
//! Human-readable identifiers handed to the customer and the operator.
//!
//! Format: `PREFIX-<unix millis>-<0..999>`, e.g. `EZL-1748786400000-42`.
//! The millisecond component strictly increases for a given generator: a
//! request landing in an already used millisecond borrows the next one. IDs
//! from one generator therefore never repeat. Across processes uniqueness is
//! best-effort and the random suffix only makes collisions unlikely.
//!
//! # Examples
//!
//! ```
//! use limo_quote::domain::value_objects::booking_id::BookingIdGenerator;
//!
//! let generator = BookingIdGenerator::default();
//! let id = generator.generate();
//! assert!(id.as_str().starts_with("EZL-"));
//! ```

use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Default booking ID prefix.
pub const DEFAULT_BOOKING_PREFIX: &str = "EZL";

/// Exclusive upper bound of the random suffix.
const SUFFIX_RANGE: u32 = 1000;

/// Opaque booking identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    /// Wraps an existing identifier, e.g. one read back from the fallback store.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the moment encoded in the timestamp component.
    ///
    /// Returns `None` for identifiers that do not follow the generated format.
    #[must_use]
    pub fn issued_at(&self) -> Option<Timestamp> {
        let mut parts = self.0.rsplitn(3, '-');
        let _suffix = parts.next()?;
        let millis = parts.next()?.parse::<i64>().ok()?;
        parts.next()?;
        Timestamp::from_millis(millis)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BookingId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Issues [`BookingId`]s.
///
/// Safe to share between concurrent requests.
#[derive(Debug)]
pub struct BookingIdGenerator {
    prefix: String,
    last_millis: AtomicI64,
}

impl BookingIdGenerator {
    /// Creates a generator with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            last_millis: AtomicI64::new(0),
        }
    }

    /// Returns the configured prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Generates a new booking ID.
    #[must_use]
    pub fn generate(&self) -> BookingId {
        let now = Timestamp::now().timestamp_millis();
        let previous = match self.last_millis.fetch_update(
            Ordering::AcqRel,
            Ordering::Acquire,
            |last| Some(now.max(last.saturating_add(1))),
        ) {
            Ok(last) | Err(last) => last,
        };
        let millis = now.max(previous.saturating_add(1));
        let suffix = rand::random::<u32>() % SUFFIX_RANGE;
        BookingId(format!("{}-{}-{}", self.prefix, millis, suffix))
    }
}

impl Default for BookingIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_BOOKING_PREFIX)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn generated_id_matches_format() {
        let id = BookingIdGenerator::default().generate();
        let pattern = Regex::new(r"^EZL-\d+-\d{1,3}$").unwrap();
        assert!(pattern.is_match(id.as_str()), "unexpected id {id}");
    }

    #[test]
    fn custom_prefix() {
        let generator = BookingIdGenerator::new("TEST");
        assert_eq!(generator.prefix(), "TEST");
        assert!(generator.generate().as_str().starts_with("TEST-"));
    }

    #[test]
    fn timestamp_component_strictly_increases() {
        let generator = BookingIdGenerator::default();
        let mut last = 0;
        for _ in 0..200 {
            let millis = generator
                .generate()
                .issued_at()
                .unwrap()
                .timestamp_millis();
            assert!(millis > last);
            last = millis;
        }
    }

    #[test]
    fn concurrent_ids_are_distinct() {
        let generator = std::sync::Arc::new(BookingIdGenerator::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = generator.clone();
                std::thread::spawn(move || {
                    (0..250).map(|_| generator.generate()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = std::collections::HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn issued_at_parses_timestamp_component() {
        let id = BookingId::new("EZL-1748786400000-7");
        assert_eq!(id.issued_at().unwrap().timestamp_millis(), 1_748_786_400_000);
    }

    #[test]
    fn issued_at_rejects_foreign_ids() {
        assert!(BookingId::new("manual-entry").issued_at().is_none());
        assert!(BookingId::new("EZL-abc-1").issued_at().is_none());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = BookingId::new("EZL-1-2");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"EZL-1-2\"");
    }
}
