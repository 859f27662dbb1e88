//! Drug facts: registry lookup with name-variant retries and a
//! generative summary fallback.

pub mod lookup;
pub mod registry;
pub mod summary;
pub mod variants;

pub use lookup::*;
pub use registry::*;
pub use summary::*;
pub use variants::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Drug facts returned to clients. Every field is optional: `None` means
/// neither the registry nor the model supplied that fact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugInfo {
    pub brand_name: Option<String>,
    pub generic_name: Option<String>,
    pub manufacturer: Option<String>,
    pub active_ingredients: Option<String>,
    pub purpose: Option<String>,
    pub warnings: Option<String>,
    pub dosage_administration: Option<String>,
    pub pregnancy_risk: Option<String>,
}

#[derive(Error, Debug)]
pub enum DrugLookupError {
    #[error("Drug name is empty")]
    EmptyName,

    /// The registry answered but had no match, and the summary fallback failed.
    #[error("Drug not found in registry and summary fallback failed: {0}")]
    NotFound(String),

    /// The registry was unreachable for every query, and the summary fallback failed.
    #[error("Failed to fetch drug information: {0}")]
    LookupFailed(String),
}
