//! Batch coordinator for the disaster-response record pipeline.
//!
//! Runs the fixed workflow — digitization, eligibility, mitigation,
//! question-answering — over a directory of scanned inputs and emits a
//! [`relief_common::BatchReport`].

pub mod batch;
pub mod config;

pub use batch::Coordinator;
pub use config::CoordinatorConfig;
