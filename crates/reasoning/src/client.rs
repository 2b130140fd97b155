use async_trait::async_trait;
use relief_common::Result;
use serde::{Deserialize, Serialize};

/// The single reply shape the pipeline accepts from a reasoning
/// service. Anything that cannot be reduced to plain text at the
/// client boundary is surfaced as a `Reasoning` error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningReply {
    pub text: String,
}

impl ReasoningReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// An image attached to a prompt, e.g. a scanned form.
#[derive(Debug, Clone)]
pub struct ImagePart {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImagePart {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Infer the mime type from the file name: `.png` maps to
    /// `image/png`, everything else to `image/jpeg`.
    pub fn for_file(file_name: &str, bytes: Vec<u8>) -> Self {
        let mime_type = if file_name.to_lowercase().ends_with(".png") {
            "image/png"
        } else {
            "image/jpeg"
        };
        Self::new(bytes, mime_type)
    }
}

/// Boundary to the external text/vision reasoning service.
///
/// Implementations must treat the service as untrusted and
/// possibly-failing; callers never assume the returned text is
/// structured unless their own contract says so.
#[async_trait]
pub trait ReasoningClient: Send + Sync {
    async fn generate(&self, prompt: &str, image: Option<&ImagePart>) -> Result<ReasoningReply>;
    fn model_name(&self) -> &str;
}

#[async_trait]
impl ReasoningClient for Box<dyn ReasoningClient> {
    async fn generate(&self, prompt: &str, image: Option<&ImagePart>) -> Result<ReasoningReply> {
        (**self).generate(prompt, image).await
    }
    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_serialization_roundtrip() {
        let reply = ReasoningReply::new("Three mitigation steps follow.");
        let json = serde_json::to_string(&reply).unwrap();
        let back: ReasoningReply = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reply);
    }

    #[test]
    fn mime_inference_from_extension() {
        assert_eq!(ImagePart::for_file("scan.png", vec![]).mime_type, "image/png");
        assert_eq!(ImagePart::for_file("SCAN.PNG", vec![]).mime_type, "image/png");
        assert_eq!(ImagePart::for_file("scan.jpg", vec![]).mime_type, "image/jpeg");
        assert_eq!(ImagePart::for_file("scan.jpeg", vec![]).mime_type, "image/jpeg");
        assert_eq!(ImagePart::for_file("scan", vec![]).mime_type, "image/jpeg");
    }
}
