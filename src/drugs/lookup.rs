//! Drug lookup driver: registry retries over name variants, then the
//! generative summary.

use std::sync::Arc;

use super::registry::DrugRegistry;
use super::summary::DrugSummarizer;
use super::variants::{candidate_queries, clean_name, name_variants};
use super::{DrugInfo, DrugLookupError};
use crate::pipeline::structuring::StructuringError;

pub struct DrugLookup {
    registry: Arc<dyn DrugRegistry>,
    summarizer: DrugSummarizer,
}

impl DrugLookup {
    pub fn new(registry: Arc<dyn DrugRegistry>, summarizer: DrugSummarizer) -> Self {
        Self {
            registry,
            summarizer,
        }
    }

    /// Resolve a drug name to facts.
    ///
    /// Tries every variant against every search field in priority order and
    /// returns the first label found. Registry errors on individual queries
    /// are skipped. If nothing matches, the raw name goes to the summary
    /// model exactly once.
    pub async fn lookup(&self, raw_name: &str) -> Result<DrugInfo, DrugLookupError> {
        let cleaned = clean_name(raw_name);
        if cleaned.is_empty() {
            return Err(DrugLookupError::EmptyName);
        }

        let variants = name_variants(&cleaned);
        let mut attempts = 0usize;
        let mut transport_failures = 0usize;

        for query in candidate_queries(&variants) {
            attempts += 1;
            match self.registry.search_label(&query).await {
                Ok(Some(info)) => {
                    tracing::info!(
                        search = %query.search_expression(),
                        attempts,
                        "Drug found in registry"
                    );
                    return Ok(info);
                }
                Ok(None) => {}
                Err(e) => {
                    if e.is_transport() {
                        transport_failures += 1;
                    }
                    tracing::debug!(
                        search = %query.search_expression(),
                        error = %e,
                        "Registry query failed, trying next candidate"
                    );
                }
            }
        }

        tracing::info!(attempts, transport_failures, "No registry match, using summary fallback");

        match self.summarizer.summarize(raw_name).await {
            Ok(info) => Ok(info),
            Err(e) if attempts > 0 && transport_failures == attempts => {
                Err(DrugLookupError::LookupFailed(e.to_string()))
            }
            Err(e) => Err(DrugLookupError::NotFound(e.to_string())),
        }
    }

    /// Generative summary only, skipping the registry.
    pub async fn summarize(&self, name: &str) -> Result<DrugInfo, StructuringError> {
        self.summarizer.summarize(name).await
    }
}
