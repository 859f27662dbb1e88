//! Store finder endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::stores::{StoreQuery, StoreRecord};

/// `GET /api/stores/search?postal_code=&state=&district=` — up to 10 stores.
pub async fn search(
    State(ctx): State<ApiContext>,
    Query(query): Query<StoreQuery>,
) -> Json<Vec<StoreRecord>> {
    let stores: Vec<StoreRecord> = ctx.stores.search(&query).into_iter().cloned().collect();
    tracing::debug!(results = stores.len(), "Store search");
    Json(stores)
}

/// `GET /api/stores/:kendra_code` — one store.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(kendra_code): Path<String>,
) -> Result<Json<StoreRecord>, ApiError> {
    let store = ctx.stores.get(&kendra_code)?;
    Ok(Json(store.clone()))
}
