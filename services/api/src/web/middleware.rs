//! services/api/src/web/middleware.rs
//!
//! Request admission and owner identification for the API routes.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use teachwave_core::GenerationError;
use tracing::warn;

use crate::web::{protocol::ErrorResponse, state::AppState};

/// Header carrying the caller-chosen owner identity for saved lessons.
pub const OWNER_HEADER: &str = "x-user-id";

/// The owner id validated by [`require_owner`], stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(pub String);

/// Identifies the caller by peer address, falling back to the first forwarded address.
pub fn caller_id(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    forwarded_for(req.headers()).unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Middleware that applies the per-caller admission gate.
///
/// Rejected requests get 429 with `{"error": "Rate limit exceeded"}` and never reach
/// the handler.
pub async fn rate_limit(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let caller = caller_id(&req);
    if !state.gate.admit(&caller, Instant::now()) {
        warn!("Rate limit exceeded for caller {}", caller);
        let body = ErrorResponse {
            error: GenerationError::AdmissionRejected.to_string(),
        };
        return (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    }
    next.run(req).await
}

/// Middleware that requires a non-empty `x-user-id` header.
///
/// If present, inserts an [`OwnerId`] into request extensions for handlers to use.
pub async fn require_owner(mut req: Request, next: Next) -> Response {
    let owner = req
        .headers()
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    match owner {
        Some(owner) => {
            req.extensions_mut().insert(OwnerId(owner));
            next.run(req).await
        }
        None => {
            let body = ErrorResponse {
                error: format!("{} header is required", OWNER_HEADER),
            };
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn caller_id_prefers_peer_address() {
        let mut req = Request::builder()
            .header("x-forwarded-for", "203.0.113.9")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 4], 5555))));
        assert_eq!(caller_id(&req), "192.168.1.4");
    }

    #[test]
    fn caller_id_falls_back_to_forwarded_header() {
        let req = Request::builder()
            .header("x-forwarded-for", " 203.0.113.9 , 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(caller_id(&req), "203.0.113.9");

        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(caller_id(&req), "unknown");
    }
}
