use std::sync::Arc;

use super::parser::{parse_model_reply, repair_prescription, ModelReply};
use super::prompt::build_prescription_prompt;
use super::types::{LlmClient, PrescriptionRecord};
use super::StructuringError;

/// Turns OCR text into a structured prescription via the language model.
pub struct PrescriptionExtractor {
    llm: Arc<dyn LlmClient>,
}

impl PrescriptionExtractor {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Extract a prescription from OCR text.
    ///
    /// A reply that is not JSON degrades to an empty record. A reply that is
    /// JSON but not an object is rejected with `InvalidModelResponse`.
    pub async fn extract(&self, ocr_text: &str) -> Result<PrescriptionRecord, StructuringError> {
        let start = std::time::Instant::now();

        let prompt = build_prescription_prompt(ocr_text);
        let reply = self.llm.generate(&prompt).await?;

        let record = match parse_model_reply(&reply) {
            ModelReply::Object(map) => repair_prescription(&map),
            ModelReply::NotAnObject(kind) => {
                return Err(StructuringError::InvalidModelResponse(format!(
                    "expected a JSON object, got {kind}"
                )));
            }
            ModelReply::Unparseable(reason) => {
                tracing::warn!(%reason, "Model reply is not JSON, returning empty prescription");
                PrescriptionRecord::default()
            }
        };

        tracing::info!(
            model = %self.llm.model_name(),
            text_len = ocr_text.len(),
            elapsed_ms = %start.elapsed().as_millis(),
            medicines = record.medicines.len(),
            "Prescription extraction complete"
        );
        Ok(record)
    }
}
