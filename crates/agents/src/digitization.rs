//! Digitization step: scanned form image in, structured record out.

use std::path::Path;
use std::sync::Arc;

use relief_common::{DigitizedRecord, Result};
use relief_reasoning::{ImagePart, ReasoningClient};
use tracing::{debug, info};

const DIGITIZATION_PROMPT: &str = r#"You are a digitization assistant specializing in scanned disaster-response records.
Analyze the provided image of a scanned document and extract all relevant information into a structured JSON format.

Key fields to extract if present:
- document_type (e.g., Insurance Claim, Incident Report, Tax Rebate Application)
- document_id or reference_number
- date_issued
- entities_involved (names of people, organizations, or agencies)
- summary (a concise 2-3 sentence overview of the document content)
- status (e.g., pending, approved, rejected)
- location_context (any addresses or geographic regions mentioned)

Output ONLY the JSON object. Do not include markdown formatting or extra text.
"#;

/// Converts one source image into a [`DigitizedRecord`] via the vision
/// reasoning service.
pub struct DigitizationAgent {
    reasoning: Arc<dyn ReasoningClient>,
}

impl DigitizationAgent {
    pub fn new(reasoning: Arc<dyn ReasoningClient>) -> Self {
        Self { reasoning }
    }

    /// Digitize a document from an image file.
    ///
    /// The reasoning reply must parse as a record payload; a malformed
    /// reply is a `Serialization` error the caller can skip-and-log.
    pub async fn digitize(&self, image_path: &Path) -> Result<DigitizedRecord> {
        let file_name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| image_path.display().to_string());

        info!(file = %file_name, "Digitizing document");

        let bytes = tokio::fs::read(image_path).await?;
        let image = ImagePart::for_file(&file_name, bytes);

        let reply = self
            .reasoning
            .generate(DIGITIZATION_PROMPT, Some(&image))
            .await?;

        let payload = strip_code_fences(&reply.text);
        let mut record: DigitizedRecord = serde_json::from_str(payload)?;
        record.source_file = file_name.clone();

        debug!(
            file = %file_name,
            document_id = ?record.document_id,
            document_type = ?record.document_type,
            "Digitized document"
        );
        Ok(record)
    }
}

/// Strip Markdown code fences the model sometimes wraps around its
/// JSON, in both the ```json and bare ``` forms.
fn strip_code_fences(text: &str) -> &str {
    let mut t = text.trim();
    if let Some(rest) = t.strip_prefix("```") {
        t = match rest.find('\n') {
            Some(i) => &rest[i + 1..],
            None => rest,
        };
        if let Some(stripped) = t.trim_end().strip_suffix("```") {
            t = stripped;
        }
        t = t.trim();
    }
    t
}
