//! Store directory and store finder.
//!
//! The directory is read once at startup from a JSON array of store records
//! and never mutated afterwards, so handlers share it behind an `Arc`
//! without locking.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of records returned by a search.
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Postal code prefix length used when no exact match exists.
const POSTAL_PREFIX_LEN: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Cannot read store directory {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Store directory is not a valid JSON array of stores: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Store not found: {0}")]
    NotFound(String),
}

/// A dispensing store as published in the directory file.
///
/// Field names on the wire follow the directory file (`pin_code`,
/// `contact_no`); keys this type does not model are kept in `extra`
/// and echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub kendra_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(rename = "pin_code", alias = "postal_code")]
    pub postal_code: String,
    pub state: String,
    pub district: String,
    #[serde(
        rename = "contact_no",
        alias = "phone",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sr_no: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Search criteria. Blank values are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreQuery {
    pub postal_code: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
}

/// Immutable, process-wide list of stores in file order.
#[derive(Debug, Clone, Default)]
pub struct StoreDirectory {
    stores: Vec<StoreRecord>,
}

impl StoreDirectory {
    pub fn new(stores: Vec<StoreRecord>) -> Self {
        Self { stores }
    }

    /// Load the directory from a JSON file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let stores: Vec<StoreRecord> = serde_json::from_str(&raw)?;
        tracing::info!(count = stores.len(), path = %path.display(), "Store directory loaded");
        Ok(Self { stores })
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Find stores by postal code, state and district.
    ///
    /// Filters narrow one another in that order. A postal code with no
    /// exact match falls back to its 3-character prefix. At most
    /// `MAX_SEARCH_RESULTS` records are returned, in directory order.
    pub fn search(&self, query: &StoreQuery) -> Vec<&StoreRecord> {
        let postal_code = non_blank(query.postal_code.as_deref());
        let state = non_blank(query.state.as_deref()).map(str::to_lowercase);
        let district = non_blank(query.district.as_deref()).map(str::to_lowercase);

        let mut candidates: Vec<&StoreRecord> = self.stores.iter().collect();

        if let Some(code) = postal_code {
            let exact: Vec<&StoreRecord> = candidates
                .iter()
                .copied()
                .filter(|s| s.postal_code == code)
                .collect();
            candidates = if exact.is_empty() {
                let prefix = postal_prefix(code);
                candidates
                    .into_iter()
                    .filter(|s| s.postal_code.starts_with(prefix))
                    .collect()
            } else {
                exact
            };
        }

        if let Some(state) = state {
            candidates.retain(|s| s.state.to_lowercase() == state);
        }

        if let Some(district) = district {
            candidates.retain(|s| s.district.to_lowercase() == district);
        }

        candidates.truncate(MAX_SEARCH_RESULTS);
        candidates
    }

    /// Look up a single store by its kendra code.
    pub fn get(&self, kendra_code: &str) -> Result<&StoreRecord, StoreError> {
        self.stores
            .iter()
            .find(|s| s.kendra_code == kendra_code)
            .ok_or_else(|| StoreError::NotFound(kendra_code.to_string()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// First three characters of a postal code, or all of it when shorter.
fn postal_prefix(code: &str) -> &str {
    match code.char_indices().nth(POSTAL_PREFIX_LEN) {
        Some((idx, _)) => &code[..idx],
        None => code,
    }
}
