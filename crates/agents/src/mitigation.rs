//! Mitigation step: summarize the whole record index into three
//! recommended actions.

use std::sync::Arc;

use relief_common::Result;
use relief_reasoning::ReasoningClient;
use relief_store::RecordStore;
use tracing::info;

/// Fixed report when the store holds no records yet.
pub const NO_RECORDS_REPORT: &str = "No digitized records available for mitigation planning.";

pub struct MitigationAgent {
    reasoning: Arc<dyn ReasoningClient>,
    store: Arc<RecordStore>,
}

impl MitigationAgent {
    pub fn new(reasoning: Arc<dyn ReasoningClient>, store: Arc<RecordStore>) -> Self {
        Self { reasoning, store }
    }

    /// Generate a mitigation report over every record in the store.
    pub async fn report(&self) -> Result<String> {
        let records = self.store.load_all().await?;
        if records.is_empty() {
            info!("Record store is empty, returning fixed mitigation report");
            return Ok(NO_RECORDS_REPORT.to_string());
        }

        // Project to what the prompt needs, preserving order
        let simplified: Vec<serde_json::Value> = records
            .iter()
            .map(|doc| {
                serde_json::json!({
                    "type": doc.document_type,
                    "location": doc.location_context,
                    "summary": doc.summary,
                })
            })
            .collect();

        let data_summary = serde_json::to_string_pretty(&simplified)?;
        let prompt = format!(
            r#"You are a mitigation reporting assistant. Your task is to analyze digitized disaster records and propose future mitigation steps.

Cumulative Disaster Records:
{data_summary}

Analyze the trends in document types, incidents, and locations.
Propose 3 specific mitigation steps to prevent or better handle future disasters.
Concise Response (MAXIMUM THREE SENTENCES):
"#
        );

        info!(record_count = records.len(), "Requesting mitigation report");
        let reply = self.reasoning.generate(&prompt, None).await?;
        Ok(reply.text.trim().to_string())
    }
}
