//! The echo endpoint.
//!
//! Parses `{"query": ...}` from the body and hands it to the session. Any
//! failure before the session is reached becomes an [`AppError`], which the
//! client sees as a 500 failure envelope.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header::CONTENT_LENGTH, HeaderMap},
    Json,
};
use serde_json::{Map, Value};

use crate::config::QUERY_PREVIEW_CHARS;
use crate::error::AppError;
use crate::session::{QueryRequest, QueryResponse};
use crate::state::AppState;

/// Read the declared body length. The endpoint refuses bodies without one.
fn declared_content_length(headers: &HeaderMap) -> Result<usize, AppError> {
    let value = headers
        .get(CONTENT_LENGTH)
        .ok_or(AppError::MissingContentLength)?;
    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .ok_or_else(|| {
            AppError::InvalidContentLength(String::from_utf8_lossy(value.as_bytes()).into_owned())
        })
}

/// First `max_chars` characters of `text`, for log lines.
fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Parse a request body into a query request.
///
/// The body must be a JSON object. Decoding into a `Map` first keeps arrays
/// from being accepted positionally by the derived struct impl.
pub fn parse_query(headers: &HeaderMap, body: &[u8]) -> Result<QueryRequest, AppError> {
    let declared = declared_content_length(headers)?;
    let body = &body[..declared.min(body.len())];
    let object: Map<String, Value> = serde_json::from_slice(body)?;
    Ok(serde_json::from_value(Value::Object(object))?)
}

/// `POST /query`
pub async fn query(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<QueryResponse>, AppError> {
    let body = body?;
    let QueryRequest { query } = parse_query(&headers, &body)?;

    tracing::info!(
        chars = query.chars().count(),
        preview = preview(&query, QUERY_PREVIEW_CHARS),
        "Query received"
    );

    let start = Instant::now();
    let result = state.session.echo(query);
    let elapsed_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        elapsed_ms,
        success = result.is_success(),
        chars = result.response_text().chars().count(),
        "Response sent"
    );

    Ok(Json(result))
}
