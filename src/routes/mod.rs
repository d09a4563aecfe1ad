//! HTTP route handlers for the echo API.
//!
//! Two routes are served: `GET /health` and `POST /query`. Every other path,
//! and every other method on those paths, gets an empty 404. A permissive CORS
//! layer answers preflight `OPTIONS` requests for any path before routing.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod query;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_API;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Empty 404 for unknown paths and unsupported methods.
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// axum serves HEAD through GET handlers; only GET is answered on `/health`.
async fn reject_head(request: Request, next: Next) -> Response {
    if request.method() == Method::HEAD {
        return not_found().await.into_response();
    }
    next.run(request).await
}

/// CORS policy: any origin, preflight advertises GET/POST/OPTIONS and Content-Type.
///
/// `tower_http` answers every `OPTIONS` request itself with 200 and no body.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(AllowMethods::list([Method::GET, Method::POST, Method::OPTIONS]))
        .allow_headers(AllowHeaders::list([CONTENT_TYPE]))
}

/// Creates the Axum router with all routes, CORS and request tracing.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/health",
            get(health::health)
                .fallback(not_found)
                .layer(middleware::from_fn(reject_head)),
        )
        // Queries are echoed whatever their size
        .route(
            "/query",
            post(query::query)
                .fallback(not_found)
                .layer(DefaultBodyLimit::disable()),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_API),
        ));

    Router::new()
        .merge(api_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(cors_layer())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
