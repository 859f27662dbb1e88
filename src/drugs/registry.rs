//! Drug registry client (openFDA label and adverse-event endpoints).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::variants::CandidateQuery;
use super::DrugInfo;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Registry request failed: {0}")]
    Transport(String),

    #[error("Registry returned status {0}")]
    Status(u16),

    #[error("Registry response could not be decoded: {0}")]
    Decode(String),
}

impl RegistryError {
    /// True when the registry could not be reached at all (timeout, DNS,
    /// connection refused), as opposed to answering with an error.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Interaction and contraindication sections of a drug label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugInteractions {
    pub drug_interactions: Option<String>,
    pub contraindications: Option<String>,
    pub boxed_warnings: Option<String>,
}

/// One adverse-event report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdverseEvent {
    pub reaction: Vec<String>,
    pub severity: Option<String>,
    pub outcome: Option<String>,
    pub report_date: Option<String>,
}

/// Drug registry abstraction (allows stubbing in tests).
#[async_trait]
pub trait DrugRegistry: Send + Sync {
    /// Run one label query. `Ok(None)` means the registry answered with an
    /// empty result set.
    async fn search_label(
        &self,
        query: &CandidateQuery,
    ) -> Result<Option<DrugInfo>, RegistryError>;

    async fn interactions(&self, name: &str) -> Result<Option<DrugInteractions>, RegistryError>;

    async fn adverse_events(
        &self,
        name: &str,
        limit: u32,
    ) -> Result<Vec<AdverseEvent>, RegistryError>;
}

/// openFDA HTTP client. Each request carries its own timeout.
pub struct OpenFdaClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

#[derive(Deserialize)]
struct RegistryResponse {
    #[serde(default)]
    results: Vec<Value>,
}

impl OpenFdaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    /// GET `{base}/{endpoint}?search=..&limit=..` and return the result list.
    /// A 404 is how openFDA reports "no matches", so it maps to an empty list.
    async fn fetch(
        &self,
        endpoint: &str,
        search: &str,
        limit: u32,
    ) -> Result<Vec<Value>, RegistryError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let limit = limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("search", search), ("limit", limit.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RegistryError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(RegistryError::Status(status.as_u16()));
        }

        let body: RegistryResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::Decode(e.without_url().to_string()))?;
        Ok(body.results)
    }
}

#[async_trait]
impl DrugRegistry for OpenFdaClient {
    async fn search_label(
        &self,
        query: &CandidateQuery,
    ) -> Result<Option<DrugInfo>, RegistryError> {
        let results = self
            .fetch("label.json", &query.search_expression(), 1)
            .await?;
        Ok(results.first().map(label_to_drug_info))
    }

    async fn interactions(&self, name: &str) -> Result<Option<DrugInteractions>, RegistryError> {
        let search = format!(r#"openfda.brand_name:"{name}" openfda.generic_name:"{name}""#);
        let results = self.fetch("label.json", &search, 1).await?;
        Ok(results.first().map(|label| DrugInteractions {
            drug_interactions: label_section(label, "drug_interactions"),
            contraindications: label_section(label, "contraindications"),
            boxed_warnings: label_section(label, "boxed_warning"),
        }))
    }

    async fn adverse_events(
        &self,
        name: &str,
        limit: u32,
    ) -> Result<Vec<AdverseEvent>, RegistryError> {
        let search = format!(r#"patient.drug.medicinalproduct:"{name}""#);
        let results = self.fetch("event.json", &search, limit).await?;
        Ok(results.iter().map(event_from_report).collect())
    }
}

// ──────────────────────────────────────────────
// Label mapping
// ──────────────────────────────────────────────

/// Map a label document to `DrugInfo`. Identity fields come from the
/// `openfda` section when present, otherwise from the label itself.
pub fn label_to_drug_info(label: &Value) -> DrugInfo {
    let identity = |field: &str| {
        label
            .get("openfda")
            .and_then(|openfda| first_text(openfda.get(field)))
            .or_else(|| first_text(label.get(field)))
    };

    DrugInfo {
        brand_name: identity("brand_name"),
        generic_name: identity("generic_name"),
        manufacturer: identity("manufacturer_name"),
        active_ingredients: label_section(label, "active_ingredient"),
        purpose: label_section(label, "purpose"),
        warnings: label_section(label, "warnings"),
        dosage_administration: label_section(label, "dosage_and_administration"),
        pregnancy_risk: label_section(label, "pregnancy"),
    }
}

fn label_section(label: &Value, field: &str) -> Option<String> {
    first_text(label.get(field))
}

/// Label fields are arrays of strings; take the first non-empty one.
/// Bare strings are accepted too.
fn first_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::Array(items) => items.first()?.as_str()?,
        Value::String(s) => s.as_str(),
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn event_from_report(report: &Value) -> AdverseEvent {
    let reactions = report
        .pointer("/patient/reaction")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    AdverseEvent {
        reaction: reactions
            .iter()
            .filter_map(|r| r.get("reactionmeddrapt").and_then(Value::as_str))
            .map(String::from)
            .collect(),
        severity: scalar_text(report.get("serious")),
        outcome: reactions
            .first()
            .and_then(|r| scalar_text(r.get("reactionoutcome"))),
        report_date: scalar_text(report.get("receiptdate")),
    }
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
