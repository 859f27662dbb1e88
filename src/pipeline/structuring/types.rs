use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::StructuringError;

/// Structured prescription returned to clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionRecord {
    pub medicines: Vec<MedicineEntry>,
    pub patient_info: PatientInfo,
    pub doctor_info: DoctorInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineEntry {
    pub name: String,
    /// Model certainty, 0-100.
    pub confidence: u8,
    pub dosage: Option<String>,
    pub frequency: Frequency,
    pub duration: Option<String>,
    pub special_instructions: Option<String>,
}

/// Time-of-day schedule. All four slots are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    pub morning: bool,
    pub afternoon: bool,
    pub evening: bool,
    pub night: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

/// Generative language model abstraction (allows mocking).
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier, for logging.
    fn model_name(&self) -> &str;

    /// Send a single prompt and return the model's raw text reply.
    async fn generate(&self, prompt: &str) -> Result<String, StructuringError>;
}
