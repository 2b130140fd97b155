//! Question-answering step: keyword retrieval over the record store
//! feeding a grounded reasoning prompt.

use std::sync::Arc;

use relief_common::{DigitizedRecord, Result};
use relief_reasoning::ReasoningClient;
use relief_store::RecordStore;
use tracing::{debug, info};

/// Fixed answer when retrieval produces nothing; the reasoner is not
/// consulted in that case.
pub const NO_RECORDS_ANSWER: &str = "No relevant records found to answer the question.";

/// Tokens must be strictly longer than this to count as keywords.
const KEYWORD_MIN_CHARS: usize = 3;

pub struct QaAgent {
    reasoning: Arc<dyn ReasoningClient>,
    store: Arc<RecordStore>,
}

impl QaAgent {
    pub fn new(reasoning: Arc<dyn ReasoningClient>, store: Arc<RecordStore>) -> Self {
        Self { reasoning, store }
    }

    /// Answer a free-text question from the digitized records.
    ///
    /// One store search per keyword; hits are accumulated as returned,
    /// so a record matching several keywords appears once per match.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let keywords = extract_keywords(question);
        debug!(question = %question, keywords = ?keywords, "Extracted keywords");

        let mut context_docs: Vec<DigitizedRecord> = Vec::new();
        for keyword in &keywords {
            context_docs.extend(self.store.search(keyword).await?);
        }

        if context_docs.is_empty() {
            info!(question = %question, "No matching records, returning fixed answer");
            return Ok(NO_RECORDS_ANSWER.to_string());
        }

        let context = build_context(&context_docs);
        let prompt = format!(
            r#"You are a retrieval-based assistant. Your goal is to answer questions based on the provided document context.
If the information is not in the context, state that you don't know based on the available records.

Context:
{context}

Question:
{question}

Concise Answer (2-3 sentences):
"#
        );

        let reply = self.reasoning.generate(&prompt, None).await?;
        Ok(reply.text.trim().to_string())
    }
}

/// Whitespace tokens with more than [`KEYWORD_MIN_CHARS`] characters.
pub fn extract_keywords(question: &str) -> Vec<&str> {
    question
        .split_whitespace()
        .filter(|token| token.chars().count() > KEYWORD_MIN_CHARS)
        .collect()
}

/// Per record: type, summary and location, in accumulation order.
fn build_context(docs: &[DigitizedRecord]) -> String {
    let mut context = String::new();
    for (i, doc) in docs.iter().enumerate() {
        context.push_str(&format!("Document {}:\n", i + 1));
        context.push_str(&format!(
            "Type: {}\n",
            doc.document_type.as_deref().unwrap_or("unknown")
        ));
        context.push_str(&format!("Summary: {}\n", doc.summary));
        context.push_str(&format!(
            "Location: {}\n",
            doc.location_context.as_deref().unwrap_or("unknown")
        ));
        context.push_str("---\n");
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use relief_reasoning::{ImagePart, ReasoningReply};
    use relief_store::StoreConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingReasoner {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReasoningClient for CountingReasoner {
        async fn generate(&self, prompt: &str, _image: Option<&ImagePart>) -> Result<ReasoningReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(prompt.contains("Context:"));
            Ok(ReasoningReply::new("Richmond is the most affected area."))
        }
        fn model_name(&self) -> &str {
            "counting"
        }
    }

    fn record(id: &str, summary: &str, location: &str) -> DigitizedRecord {
        DigitizedRecord {
            document_id: Some(id.to_string()),
            document_type: Some("Incident Report".to_string()),
            summary: summary.to_string(),
            location_context: Some(location.to_string()),
            source_file: format!("{id}.png"),
            ..Default::default()
        }
    }

    async fn store_with_records(dir: &tempfile::TempDir) -> Arc<RecordStore> {
        let store = Arc::new(
            RecordStore::open(StoreConfig {
                output_dir: dir.path().join("records"),
            })
            .unwrap(),
        );
        store
            .append(&record("DOC-1", "Flooding along the river", "Richmond"))
            .await
            .unwrap();
        store
            .append(&record("DOC-2", "Wildfire damage", "Palisades"))
            .await
            .unwrap();
        store
    }

    #[test]
    fn keywords_require_more_than_three_chars() {
        assert_eq!(extract_keywords("What happened?"), vec!["What", "happened?"]);
        assert!(extract_keywords("Who is it").is_empty());
        assert!(extract_keywords("it is so far off").is_empty());
        assert_eq!(
            extract_keywords("Where did flooding occur?"),
            vec!["Where", "flooding", "occur?"]
        );
    }

    #[test]
    fn context_block_format() {
        let docs = vec![record("DOC-1", "Flooding along the river", "Richmond")];
        let context = build_context(&docs);
        assert_eq!(
            context,
            "Document 1:\nType: Incident Report\nSummary: Flooding along the river\nLocation: Richmond\n---\n"
        );
    }

    #[tokio::test]
    async fn short_token_question_skips_search_and_reasoner() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_with_records(&dir).await;
        let reasoner = Arc::new(CountingReasoner {
            calls: AtomicUsize::new(0),
        });
        let agent = QaAgent::new(reasoner.clone(), store);

        // Every token here is three characters or fewer
        let answer = agent.answer("Who did it?").await.unwrap();
        assert_eq!(answer, NO_RECORDS_ANSWER);
        assert_eq!(reasoner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_matches_returns_fixed_answer() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_with_records(&dir).await;
        let reasoner = Arc::new(CountingReasoner {
            calls: AtomicUsize::new(0),
        });
        let agent = QaAgent::new(reasoner.clone(), store);

        let answer = agent.answer("Anything about earthquakes?").await.unwrap();
        assert_eq!(answer, NO_RECORDS_ANSWER);
        assert_eq!(reasoner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn matching_question_reaches_reasoner() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_with_records(&dir).await;
        let reasoner = Arc::new(CountingReasoner {
            calls: AtomicUsize::new(0),
        });
        let agent = QaAgent::new(reasoner.clone(), store);

        let answer = agent.answer("What flooding occurred near Richmond?").await.unwrap();
        assert_eq!(answer, "Richmond is the most affected area.");
        assert_eq!(reasoner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn hits_accumulate_per_keyword_without_dedup() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_with_records(&dir).await;

        // DOC-1 matches both "flooding" and "Richmond"
        let mut accumulated = Vec::new();
        for kw in extract_keywords("Tell me about flooding in Richmond") {
            accumulated.extend(store.search(kw).await.unwrap());
        }
        let doc1_hits = accumulated
            .iter()
            .filter(|d| d.document_id.as_deref() == Some("DOC-1"))
            .count();
        assert_eq!(doc1_hits, 2);
    }
}
