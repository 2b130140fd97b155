//! The batch coordinator: a fixed, non-branching four-phase sequence
//! over one directory of scanned inputs.
//!
//! Phase order is digitization, eligibility, mitigation, then
//! question-answering. Per-item failures are isolated: a file that
//! fails to digitize, a resident whose check errors or a question whose
//! answer errors each get an explicit placeholder in the report, and
//! the batch always completes. Later phases run against the fully
//! settled record store.

use std::path::Path;
use std::sync::Arc;

use relief_agents::{DigitizationAgent, EligibilityAgent, MitigationAgent, QaAgent};
use relief_common::{BatchReport, DocumentOutcome, EligibilityDecision, QuestionOutcome};
use relief_reasoning::ReasoningClient;
use relief_store::{RecordStore, ResidentDirectory, ZoneRegistry};
use tracing::{error, info, warn};

pub struct Coordinator {
    digitization: DigitizationAgent,
    eligibility: EligibilityAgent,
    mitigation: MitigationAgent,
    qa: QaAgent,
    store: Arc<RecordStore>,
    residents: Vec<String>,
}

impl Coordinator {
    pub fn new(
        reasoning: Arc<dyn ReasoningClient>,
        store: Arc<RecordStore>,
        directory: Arc<dyn ResidentDirectory>,
        zones: Arc<dyn ZoneRegistry>,
        residents: Vec<String>,
    ) -> Self {
        info!(model = %reasoning.model_name(), "Initializing coordinator");
        Self {
            digitization: DigitizationAgent::new(reasoning.clone()),
            eligibility: EligibilityAgent::new(reasoning.clone(), directory, zones),
            mitigation: MitigationAgent::new(reasoning.clone(), store.clone()),
            qa: QaAgent::new(reasoning, store.clone()),
            store,
            residents,
        }
    }

    /// Run the full workflow over one input directory. Always produces
    /// a complete report; failures surface as per-item placeholders.
    pub async fn run(&self, input_dir: &Path, questions: &[String]) -> BatchReport {
        let mut report = BatchReport::new();
        info!(run_id = %report.run_id, input_dir = %input_dir.display(), "Starting batch");

        self.run_digitization(input_dir, &mut report).await;
        self.run_eligibility(&mut report).await;
        self.run_mitigation(&mut report).await;
        self.run_questions(questions, &mut report).await;

        info!(
            run_id = %report.run_id,
            digitized = report.digitized_count(),
            residents = report.eligibility.len(),
            questions = report.answers.len(),
            "Batch complete"
        );
        report
    }

    async fn run_digitization(&self, input_dir: &Path, report: &mut BatchReport) {
        let files = list_input_images(input_dir);
        info!(phase = "digitization", files = files.len(), "Phase 1");

        for file_name in files {
            let path = input_dir.join(&file_name);
            match self.digitization.digitize(&path).await {
                Ok(record) => match self.store.append(&record).await {
                    Ok(stored_path) => {
                        report
                            .documents
                            .push(DocumentOutcome::stored(&file_name, stored_path));
                    }
                    Err(e) => {
                        error!(file = %file_name, error = %e, "Failed to persist record");
                        report
                            .documents
                            .push(DocumentOutcome::skipped(&file_name, e.to_string()));
                    }
                },
                Err(e) => {
                    warn!(file = %file_name, error = %e, "Failed to digitize, skipping");
                    report
                        .documents
                        .push(DocumentOutcome::skipped(&file_name, e.to_string()));
                }
            }
        }
    }

    async fn run_eligibility(&self, report: &mut BatchReport) {
        info!(phase = "eligibility", residents = self.residents.len(), "Phase 2");

        for resident in &self.residents {
            let decision = match self.eligibility.verify(resident).await {
                Ok(decision) => decision,
                Err(e) => {
                    warn!(resident = %resident, error = %e, "Eligibility check failed");
                    EligibilityDecision::new(
                        resident,
                        "unavailable",
                        format!("Eligibility check failed: {e}"),
                    )
                }
            };
            report.eligibility.push(decision);
        }
    }

    async fn run_mitigation(&self, report: &mut BatchReport) {
        info!(phase = "mitigation", "Phase 3");

        report.mitigation = match self.mitigation.report().await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Mitigation report failed");
                format!("Mitigation report unavailable: {e}")
            }
        };
    }

    async fn run_questions(&self, questions: &[String], report: &mut BatchReport) {
        info!(phase = "question-answering", questions = questions.len(), "Phase 4");

        for question in questions {
            let answer = match self.qa.answer(question).await {
                Ok(answer) => answer,
                Err(e) => {
                    warn!(question = %question, error = %e, "Question answering failed");
                    format!("Answer unavailable: {e}")
                }
            };
            report.answers.push(QuestionOutcome {
                question: question.clone(),
                answer,
            });
        }
    }
}

/// Supported scanned-input files in the directory, in name order. A
/// missing or unreadable directory yields an empty batch, not a crash.
fn list_input_images(input_dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(input_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(input_dir = %input_dir.display(), error = %e, "Cannot read input directory");
            return Vec::new();
        }
    };

    let mut files: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| is_supported_image(name))
        .collect();
    files.sort();
    files
}

fn is_supported_image(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".png") || lower.ends_with(".jpg") || lower.ends_with(".jpeg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_image_extensions() {
        assert!(is_supported_image("scan.png"));
        assert!(is_supported_image("SCAN.PNG"));
        assert!(is_supported_image("photo.jpeg"));
        assert!(is_supported_image("photo.jpg"));
        assert!(!is_supported_image("notes.txt"));
        assert!(!is_supported_image("archive.pdf"));
    }

    #[test]
    fn missing_input_dir_is_empty_batch() {
        assert!(list_input_images(Path::new("/nonexistent/input")).is_empty());
    }

    #[test]
    fn input_files_are_name_ordered() {
        let dir = tempfile::TempDir::new().unwrap();
        for name in ["b.png", "a.jpg", "c.jpeg", "skip.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        assert_eq!(list_input_images(dir.path()), vec!["a.jpg", "b.png", "c.jpeg"]);
    }
}
