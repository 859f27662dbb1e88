//! Drug information endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::drugs::{AdverseEvent, DrugInfo, DrugInteractions};

/// Default number of adverse-event reports returned.
const DEFAULT_EVENT_LIMIT: u32 = 10;
/// Upper bound on adverse-event reports per request.
const MAX_EVENT_LIMIT: u32 = 100;

#[derive(Deserialize)]
pub struct LlmSearchRequest {
    pub medicine_name: String,
}

#[derive(Deserialize)]
pub struct AdverseEventsQuery {
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct AdverseEventsResponse {
    pub adverse_events: Vec<AdverseEvent>,
}

/// `GET /api/drugs/search/:name` — registry lookup with summary fallback.
pub async fn search(
    State(ctx): State<ApiContext>,
    Path(name): Path<String>,
) -> Result<Json<DrugInfo>, ApiError> {
    Ok(Json(ctx.drugs.lookup(&name).await?))
}

/// `POST /api/drugs/llm-search` — generative summary only.
pub async fn llm_search(
    State(ctx): State<ApiContext>,
    Json(payload): Json<LlmSearchRequest>,
) -> Result<Json<DrugInfo>, ApiError> {
    if payload.medicine_name.trim().is_empty() {
        return Err(ApiError::BadRequest("medicine_name is required".into()));
    }
    Ok(Json(ctx.drugs.summarize(&payload.medicine_name).await?))
}

/// `GET /api/drugs/interactions/:name` — interaction and warning sections.
pub async fn interactions(
    State(ctx): State<ApiContext>,
    Path(name): Path<String>,
) -> Result<Json<DrugInteractions>, ApiError> {
    let name = required_name(&name)?;
    ctx.registry
        .interactions(name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No interaction data found for {name}")))
}

/// `GET /api/drugs/adverse-events/:name?limit=N` — reported adverse events.
pub async fn adverse_events(
    State(ctx): State<ApiContext>,
    Path(name): Path<String>,
    Query(query): Query<AdverseEventsQuery>,
) -> Result<Json<AdverseEventsResponse>, ApiError> {
    let name = required_name(&name)?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_EVENT_LIMIT)
        .clamp(1, MAX_EVENT_LIMIT);

    let adverse_events = ctx.registry.adverse_events(name, limit).await?;
    if adverse_events.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No adverse events found for {name}"
        )));
    }
    Ok(Json(AdverseEventsResponse { adverse_events }))
}

fn required_name(name: &str) -> Result<&str, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Drug name is empty".into()));
    }
    Ok(name)
}
