//! Generative drug summary, used when the registry has no match.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::DrugInfo;
use crate::pipeline::structuring::{
    build_drug_summary_prompt, parse_model_reply, value_to_text, LlmClient, ModelReply,
    StructuringError,
};

/// Maximum sentence-delimited clauses kept per summary field.
const MAX_SUMMARY_CLAUSES: usize = 2;

pub struct DrugSummarizer {
    llm: Arc<dyn LlmClient>,
}

impl DrugSummarizer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Ask the model for a short summary of `medicine_name`. The name is
    /// sent exactly as given.
    pub async fn summarize(&self, medicine_name: &str) -> Result<DrugInfo, StructuringError> {
        let prompt = build_drug_summary_prompt(medicine_name);
        let reply = self.llm.generate(&prompt).await?;

        match parse_model_reply(&reply) {
            ModelReply::Object(map) => {
                tracing::info!(model = %self.llm.model_name(), "Drug summary generated");
                Ok(summary_to_drug_info(&map))
            }
            ModelReply::NotAnObject(kind) => Err(StructuringError::InvalidModelResponse(
                format!("expected a JSON object, got {kind}"),
            )),
            ModelReply::Unparseable(reason) => {
                Err(StructuringError::InvalidModelResponse(reason))
            }
        }
    }
}

fn summary_to_drug_info(map: &Map<String, Value>) -> DrugInfo {
    let field = |key: &str| value_to_text(map.get(key)).map(|text| truncate_clauses(&text));
    DrugInfo {
        brand_name: field("brand_name"),
        generic_name: field("generic_name"),
        manufacturer: field("manufacturer"),
        active_ingredients: field("active_ingredients"),
        purpose: field("purpose"),
        warnings: field("warnings"),
        dosage_administration: field("dosage_administration"),
        pregnancy_risk: field("pregnancy_risk"),
    }
}

/// Keep the first two `.`-delimited clauses, rejoined with `". "`.
pub fn truncate_clauses(text: &str) -> String {
    text.split('.')
        .take(MAX_SUMMARY_CLAUSES)
        .collect::<Vec<_>>()
        .join(". ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::structuring::MockLlmClient;

    #[test]
    fn truncate_keeps_first_two_clauses() {
        assert_eq!(
            truncate_clauses("Relieves pain. Reduces fever. Also used for colds."),
            "Relieves pain.  Reduces fever"
        );
        assert_eq!(truncate_clauses("Single clause"), "Single clause");
        assert_eq!(truncate_clauses("One. Two."), "One.  Two");
    }

    #[tokio::test]
    async fn summary_reply_maps_to_drug_info() {
        let mock = Arc::new(MockLlmClient::new(
            r#"```json
{
  "brand_name": "Dolo 650",
  "generic_name": "Paracetamol",
  "manufacturer": null,
  "active_ingredients": "Paracetamol 650 mg",
  "purpose": "Treats fever. Relieves mild pain. Widely used.",
  "warnings": "Avoid overdose",
  "dosage_administration": "One tablet every 6 hours",
  "pregnancy_risk": "Category B"
}
```"#,
        ));
        let summarizer = DrugSummarizer::new(mock.clone());
        let info = summarizer.summarize("dolo 650").await.unwrap();

        assert_eq!(info.brand_name.as_deref(), Some("Dolo 650"));
        assert!(info.manufacturer.is_none());
        assert_eq!(info.purpose.as_deref(), Some("Treats fever.  Relieves mild pain"));
        assert!(mock.prompts()[0].contains("medicine/drug: dolo 650"));
    }

    #[tokio::test]
    async fn unparseable_summary_is_invalid_model_response() {
        let summarizer = DrugSummarizer::new(Arc::new(MockLlmClient::new("no idea")));
        let err = summarizer.summarize("xyz").await.unwrap_err();
        assert!(matches!(err, StructuringError::InvalidModelResponse(_)));
    }

    #[tokio::test]
    async fn array_summary_is_invalid_model_response() {
        let summarizer = DrugSummarizer::new(Arc::new(MockLlmClient::new("[]")));
        let err = summarizer.summarize("xyz").await.unwrap_err();
        assert!(matches!(err, StructuringError::InvalidModelResponse(_)));
    }
}
