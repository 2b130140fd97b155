//! The four pipeline steps of the disaster-response workflow.
//!
//! - **Digitization**: scanned image to structured record, via the
//!   vision reasoning service
//! - **Eligibility**: resident directory lookup plus zone check, with
//!   the decision text delegated to the reasoner
//! - **Question-Answering**: keyword retrieval over the record store
//!   feeding a grounded prompt
//! - **Mitigation**: whole-index summary proposing three actions
//!
//! Each step owns an `Arc<dyn ReasoningClient>` and its data
//! dependencies; none of them mutate store state except digitization's
//! caller appending the records it produces.

pub mod digitization;
pub mod eligibility;
pub mod mitigation;
pub mod qa;

pub use digitization::DigitizationAgent;
pub use eligibility::{EligibilityAgent, RuleOutcome, evaluate_rules};
pub use mitigation::{MitigationAgent, NO_RECORDS_REPORT};
pub use qa::{NO_RECORDS_ANSWER, QaAgent, extract_keywords};
