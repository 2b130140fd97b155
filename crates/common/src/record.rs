//! Record types for digitized documents and resident lookups.

use serde::{Deserialize, Serialize};

/// Processing status extracted from a scanned document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Approved,
    Rejected,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A structured record produced by digitizing one scanned document.
///
/// The reasoning service returns these as JSON; fields it omits fall
/// back to their defaults rather than failing the parse. Records are
/// immutable once appended to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigitizedRecord {
    /// Document category, e.g. "Insurance Claim" or "Incident Report"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,

    /// Reference number printed on the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,

    /// Issue date as printed (not normalized)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_issued: Option<String>,

    /// People, organizations or agencies named in the document
    #[serde(default)]
    pub entities_involved: Vec<String>,

    /// Concise overview of the document content
    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub status: RecordStatus,

    /// Addresses or geographic regions mentioned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_context: Option<String>,

    /// Name of the input file this record was digitized from
    #[serde(default)]
    pub source_file: String,
}

/// A resident's eligibility record from the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentRecord {
    pub address: String,
    pub tax_rebate_eligible: bool,
    pub disaster_affected: bool,
}

/// Outcome of an eligibility check for one resident. Derived per run,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityDecision {
    pub resident: String,

    /// Boolean-ish verdict: "eligible", "ineligible", "undetermined",
    /// "cannot verify" or "unavailable"
    pub verdict: String,

    pub justification: String,
}

impl EligibilityDecision {
    pub fn new(
        resident: impl Into<String>,
        verdict: impl Into<String>,
        justification: impl Into<String>,
    ) -> Self {
        Self {
            resident: resident.into(),
            verdict: verdict.into(),
            justification: justification.into(),
        }
    }

    /// Decision for a resident with no directory record. The reasoning
    /// service is never consulted for these.
    pub fn cannot_verify(resident: impl Into<String>) -> Self {
        let resident = resident.into();
        let justification = format!("No record found for resident: {resident}");
        Self {
            resident,
            verdict: "cannot verify".into(),
            justification,
        }
    }
}
