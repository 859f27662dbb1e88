//! Candidate registry queries for a drug name.
//!
//! A name is cleaned, expanded into spelling variants, and each variant is
//! paired with every search field. The resulting sequence is lazy and its
//! order is the tie-break: earlier candidates win.

use std::fmt;

/// Registry fields searched for each name variant, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    BrandName,
    GenericName,
    SubstanceName,
    ProductNdc,
}

impl SearchField {
    pub const PRIORITY: [SearchField; 4] = [
        SearchField::BrandName,
        SearchField::GenericName,
        SearchField::SubstanceName,
        SearchField::ProductNdc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BrandName => "brand_name",
            Self::GenericName => "generic_name",
            Self::SubstanceName => "substance_name",
            Self::ProductNdc => "product_ndc",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One registry query: a name variant searched under one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    pub variant: String,
    pub field: SearchField,
}

impl CandidateQuery {
    /// Registry search expression, e.g. `brand_name:TYLENOL`.
    pub fn search_expression(&self) -> String {
        format!("{}:{}", self.field, self.variant)
    }
}

/// Trim and uppercase a raw drug name.
pub fn clean_name(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Spelling variants of a cleaned name, in query order:
///
/// 1. the name itself
/// 2. its first whitespace-delimited token
/// 3. the name without spaces
/// 4. the name without hyphens
/// 5. the part before the first hyphen
/// 6. first and last token joined by a space (multi-token names only)
///
/// Empty variants and repeats of an earlier variant are dropped.
pub fn name_variants(cleaned: &str) -> Vec<String> {
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let first = tokens.first().copied().unwrap_or("");

    let mut candidates = vec![
        cleaned.to_string(),
        first.to_string(),
        cleaned.replace(' ', ""),
        cleaned.replace('-', ""),
        cleaned.split('-').next().unwrap_or("").to_string(),
    ];
    if let [_, .., last] = tokens.as_slice() {
        candidates.push(format!("{first} {last}"));
    }

    let mut variants: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

/// Lazily pair every variant with every search field: variants outer,
/// fields inner, both in priority order.
pub fn candidate_queries(variants: &[String]) -> impl Iterator<Item = CandidateQuery> + '_ {
    variants.iter().flat_map(|variant| {
        SearchField::PRIORITY.iter().map(move |field| CandidateQuery {
            variant: variant.clone(),
            field: *field,
        })
    })
}
