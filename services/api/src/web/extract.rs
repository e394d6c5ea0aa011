//! services/api/src/web/extract.rs
//!
//! Request extractors whose rejections answer with the JSON error body.

use crate::web::protocol::ErrorResponse;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// `Json<T>` with a `{"error": ...}` rejection.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(RequestRejection))]
pub struct ApiJson<T>(pub T);

/// `Path<T>` with a `{"error": ...}` rejection.
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(RequestRejection))]
pub struct ApiPath<T>(pub T);

/// A malformed request, keeping axum's status and message.
#[derive(Debug)]
pub struct RequestRejection {
    status: StatusCode,
    message: String,
}

impl From<JsonRejection> for RequestRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for RequestRejection {
    fn from(rejection: PathRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for RequestRejection {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}
