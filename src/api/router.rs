//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Layers (outermost → innermost):
//! 1. CORS → 2. Request logging → 3. Body limit → Handler

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::{ApiContext, HttpSettings};

/// Build the API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext, settings: &HttpSettings) -> Router {
    let api = Router::new()
        .route("/drugs/search/:name", get(endpoints::drugs::search))
        .route("/drugs/llm-search", post(endpoints::drugs::llm_search))
        .route(
            "/drugs/interactions/:name",
            get(endpoints::drugs::interactions),
        )
        .route(
            "/drugs/adverse-events/:name",
            get(endpoints::drugs::adverse_events),
        )
        .route("/stores/search", get(endpoints::stores::search))
        .route("/stores/:kendra_code", get(endpoints::stores::detail))
        .route(
            "/analyze-prescription",
            post(endpoints::prescriptions::analyze),
        )
        .route("/extract-text", post(endpoints::pdf::extract_text));

    Router::new()
        .route("/", get(endpoints::health::root))
        .route("/health", get(endpoints::health::check))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .layer(axum::middleware::from_fn(middleware::access::log_request))
        .layer(cors_layer(&settings.cors_origins))
        .with_state(ctx)
}

/// Credentialed CORS for the configured origins. Methods and headers
/// mirror the preflight request.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
