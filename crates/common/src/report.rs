//! Batch report types emitted by the coordinator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::record::EligibilityDecision;

/// Result of digitizing one input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOutcome {
    pub source_file: String,

    /// Where the record was persisted, when digitization succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_path: Option<PathBuf>,

    /// Failure placeholder for skipped inputs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentOutcome {
    pub fn stored(source_file: impl Into<String>, path: PathBuf) -> Self {
        Self {
            source_file: source_file.into(),
            stored_path: Some(path),
            error: None,
        }
    }

    pub fn skipped(source_file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            stored_path: None,
            error: Some(error.into()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Answer produced for one free-text question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question: String,
    pub answer: String,
}

/// Everything one coordinator run produced, phase by phase. Every item
/// carries either a result or an explicit failure placeholder; a batch
/// always completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique id for this run
    pub run_id: String,

    pub documents: Vec<DocumentOutcome>,
    pub eligibility: Vec<EligibilityDecision>,
    pub mitigation: String,
    pub answers: Vec<QuestionOutcome>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self {
            run_id: format!("run_{}", uuid::Uuid::new_v4()),
            documents: Vec::new(),
            eligibility: Vec::new(),
            mitigation: String::new(),
            answers: Vec::new(),
        }
    }

    pub fn digitized_count(&self) -> usize {
        self.documents.iter().filter(|d| d.succeeded()).count()
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_constructors() {
        let ok = DocumentOutcome::stored("a.png", PathBuf::from("/out/a.json"));
        assert!(ok.succeeded());

        let skipped = DocumentOutcome::skipped("b.png", "unreadable");
        assert!(!skipped.succeeded());
        assert_eq!(skipped.error.as_deref(), Some("unreadable"));
    }

    #[test]
    fn report_has_unique_run_ids() {
        let a = BatchReport::new();
        let b = BatchReport::new();
        assert_ne!(a.run_id, b.run_id);
        assert!(a.run_id.starts_with("run_"));
    }

    #[test]
    fn digitized_count_skips_failures() {
        let mut report = BatchReport::new();
        report
            .documents
            .push(DocumentOutcome::stored("a.png", PathBuf::from("a.json")));
        report
            .documents
            .push(DocumentOutcome::skipped("b.png", "bad payload"));
        assert_eq!(report.digitized_count(), 1);
    }

    #[test]
    fn report_serializes_to_json() {
        let mut report = BatchReport::new();
        report.mitigation = "Elevate critical equipment.".into();
        report.answers.push(QuestionOutcome {
            question: "What areas are most affected?".into(),
            answer: "Richmond, per the incident reports.".into(),
        });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mitigation"], "Elevate critical equipment.");
        assert_eq!(json["answers"][0]["question"], "What areas are most affected?");
    }
}
