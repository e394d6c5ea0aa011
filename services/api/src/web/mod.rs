pub mod export;
pub mod extract;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;

use crate::config::Config;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

pub use middleware::{rate_limit, require_owner};
pub use rest::{
    cover_handler, create_lesson_handler, delete_lesson_handler, export_doc_handler,
    export_lesson_doc_handler, export_lesson_print_handler, export_print_handler,
    generate_handler, get_lesson_handler, list_lessons_handler, plan_handler, simplify_handler,
};
use state::AppState;

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            ACCEPT,
            HeaderName::from_static(middleware::OWNER_HEADER),
        ]);

    match config.allowed_origin.as_deref().map(str::parse::<HeaderValue>) {
        Some(Ok(origin)) => layer.allow_origin(origin).allow_credentials(true),
        Some(Err(e)) => {
            warn!("Ignoring invalid ALLOWED_ORIGIN ({}); allowing any origin", e);
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}

/// Builds the API router. Generation and cover routes pass through the admission gate.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let gated_routes = Router::new()
        .route("/api/generate", post(generate_handler))
        .route("/api/plan", post(plan_handler))
        .route("/api/simplify", post(simplify_handler))
        .route("/api/cover", post(cover_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            rate_limit,
        ));

    let lesson_routes = Router::new()
        .route(
            "/api/lessons",
            post(create_lesson_handler).get(list_lessons_handler),
        )
        .route(
            "/api/lessons/{id}",
            get(get_lesson_handler).delete(delete_lesson_handler),
        )
        .route("/api/lessons/{id}/export/doc", get(export_lesson_doc_handler))
        .route(
            "/api/lessons/{id}/export/print",
            get(export_lesson_print_handler),
        )
        .layer(axum_middleware::from_fn(require_owner));

    let export_routes = Router::new()
        .route("/api/export/doc", post(export_doc_handler))
        .route("/api/export/print", post(export_print_handler));

    Router::new()
        .merge(gated_routes)
        .merge(lesson_routes)
        .merge(export_routes)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors_layer(&app_state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
