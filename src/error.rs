use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::session::QueryResponse;

/// Failures while turning a request into a query.
///
/// Every variant is reported to the client as a 500 with the failure envelope,
/// carrying the error text so the frontend can show it.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing Content-Length header")]
    MissingContentLength,

    #[error("Invalid Content-Length header: {0}")]
    InvalidContentLength(String),

    #[error("Failed to read request body: {0}")]
    Body(#[from] BytesRejection),

    #[error("Malformed JSON body: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Query failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(QueryResponse::failure(self.to_string())),
        )
            .into_response()
    }
}
