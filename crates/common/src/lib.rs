//! Common types shared across the relief crates.
//!
//! This crate provides the error taxonomy, the digitized-record data
//! model and the batch report types that every other crate builds on.

pub mod error;
pub mod record;
pub mod report;

pub use error::{ReliefError, Result};
pub use record::{DigitizedRecord, EligibilityDecision, RecordStatus, ResidentRecord};
pub use report::{BatchReport, DocumentOutcome, QuestionOutcome};
