//! # Application Services
//!
//! - [`QuoteSubmissionService`]: validate, deliver, fall back, report
//! - [`FallbackRecorder`]: captures requests whose emails failed

pub mod fallback_recorder;
pub mod quote_submission;

pub use fallback_recorder::FallbackRecorder;
pub use quote_submission::{QuoteSubmissionService, SubmissionOutcome};
