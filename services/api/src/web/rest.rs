//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::{
    export::{
        attachment_header, doc_document, export_file_name, print_document, render_markdown,
        PrintLayout, DOC_CONTENT_TYPE,
    },
    extract::{ApiJson, ApiPath},
    middleware::OwnerId,
    protocol::{
        CoverRequestBody, CoverResponse, CreateLessonResponse, DocExportRequest, ErrorResponse,
        GenerateRequest, GenerateResponse, LessonForm, LessonPlanResponse, LessonSummary,
        PrintExportRequest, SaveLessonRequest, SavedLessonResponse, SimplifyRequest,
        SimplifyResponse,
    },
    state::AppState,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use std::sync::Arc;
use teachwave_core::{
    domain::{CoverRequest, LessonRequest, NewLesson, SavedLesson},
    ports::PortError,
    GenerationError,
};
use tracing::{error, info, warn};
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_handler,
        plan_handler,
        simplify_handler,
        cover_handler,
        create_lesson_handler,
        list_lessons_handler,
        get_lesson_handler,
        delete_lesson_handler,
        export_lesson_doc_handler,
        export_doc_handler,
        export_lesson_print_handler,
        export_print_handler,
    ),
    components(
        schemas(
            GenerateRequest, GenerateResponse, LessonForm, LessonPlanResponse, SimplifyRequest,
            SimplifyResponse, CoverRequestBody, CoverResponse, SaveLessonRequest,
            CreateLessonResponse, LessonSummary, SavedLessonResponse, DocExportRequest,
            PrintExportRequest, ErrorResponse
        )
    ),
    tags(
        (name = "TeachWave API", description = "Lesson generation, covers, export and saved lessons.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Mapping
//=========================================================================================

pub type HandlerError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn generation_error(err: GenerationError) -> HandlerError {
    let status = match err {
        GenerationError::AdmissionRejected => StatusCode::TOO_MANY_REQUESTS,
        GenerationError::EmptyInput(_) | GenerationError::UnsupportedLanguage(_) => {
            StatusCode::BAD_REQUEST
        }
        GenerationError::UpstreamUnavailable(_) | GenerationError::MalformedUpstreamResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
    };
    error_response(status, err.to_string())
}

fn store_error(context: &str, err: PortError) -> HandlerError {
    match err {
        PortError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "Not found"),
        other => {
            error!("{}: {:?}", context, other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, context)
        }
    }
}

/// Fetches a lesson, hiding lessons that belong to someone else.
async fn owned_lesson(state: &AppState, owner: &OwnerId, id: Uuid) -> Result<SavedLesson, HandlerError> {
    let lesson = state
        .lessons
        .get_lesson(id)
        .await
        .map_err(|e| store_error("Failed to load lesson", e))?;
    if lesson.owner != owner.0 {
        return Err(error_response(StatusCode::NOT_FOUND, "Not found"));
    }
    Ok(lesson)
}

fn doc_attachment(topic: &str, document: String) -> impl IntoResponse {
    let file_name = export_file_name(topic, "doc");
    (
        [
            (header::CONTENT_TYPE, DOC_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, attachment_header(&file_name)),
        ],
        document,
    )
}

//=========================================================================================
// Generation Handlers
//=========================================================================================

/// Forward a pre-assembled prompt to the completion service.
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated text", body = GenerateResponse),
        (status = 400, description = "Missing prompt", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 502, description = "Completion service failed", body = ErrorResponse)
    )
)]
pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, HandlerError> {
    let language = req
        .language
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| "English".to_string());
    let output = state
        .generator
        .complete(&req.prompt, &language)
        .await
        .map_err(generation_error)?;
    Ok(Json(GenerateResponse { output }))
}

/// Render the persona template for a lesson form and generate the lesson.
#[utoipa::path(
    post,
    path = "/api/plan",
    request_body = LessonForm,
    responses(
        (status = 200, description = "Generated lesson", body = LessonPlanResponse),
        (status = 400, description = "Unsupported language", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 502, description = "Completion service failed", body = ErrorResponse)
    )
)]
pub async fn plan_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(form): ApiJson<LessonForm>,
) -> Result<Json<LessonPlanResponse>, HandlerError> {
    let request = LessonRequest::try_from(form).map_err(generation_error)?;
    let lesson = state
        .generator
        .generate_plan(&request)
        .await
        .map_err(generation_error)?;

    Ok(Json(LessonPlanResponse {
        html: render_markdown(&lesson.output),
        output: lesson.output,
        prompt: lesson.prompt,
        language: lesson.language.name().to_string(),
    }))
}

/// Rewrite existing lesson text for a simpler audience.
#[utoipa::path(
    post,
    path = "/api/simplify",
    request_body = SimplifyRequest,
    responses(
        (status = 200, description = "Simplified text", body = SimplifyResponse),
        (status = 400, description = "No content to simplify", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 502, description = "Completion service failed", body = ErrorResponse)
    )
)]
pub async fn simplify_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SimplifyRequest>,
) -> Result<Json<SimplifyResponse>, HandlerError> {
    let language = match req.language.trim() {
        "" => "English",
        other => other,
    };
    let output = state
        .generator
        .simplify(&req.persona, &req.text, language)
        .await
        .map_err(generation_error)?;
    Ok(Json(SimplifyResponse {
        html: render_markdown(&output),
        output,
    }))
}

/// Render a cover image for a lesson.
#[utoipa::path(
    post,
    path = "/api/cover",
    request_body = CoverRequestBody,
    responses(
        (status = 200, description = "Cover data URL", body = CoverResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Cover generation failed", body = ErrorResponse)
    )
)]
pub async fn cover_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<CoverRequestBody>,
) -> Result<Json<CoverResponse>, HandlerError> {
    let request = CoverRequest::from(body);
    let data_url = state
        .cover_adapter
        .generate_cover(&request)
        .await
        .map_err(|e| {
            error!("Cover generation failed: {:?}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "cover generation failed")
        })?;
    Ok(Json(CoverResponse { data_url }))
}

//=========================================================================================
// Saved Lesson Handlers
//=========================================================================================

/// Save a generated lesson.
///
/// A cover is rendered when the request does not carry one; a cover failure
/// does not prevent saving.
#[utoipa::path(
    post,
    path = "/api/lessons",
    request_body = SaveLessonRequest,
    responses(
        (status = 201, description = "Lesson saved", body = CreateLessonResponse),
        (status = 400, description = "No content to save", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    params(
        ("x-user-id" = String, Header, description = "The owner of the lesson.")
    )
)]
pub async fn create_lesson_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    ApiJson(req): ApiJson<SaveLessonRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if req.html.trim().chars().count() < 5 {
        return Err(error_response(StatusCode::BAD_REQUEST, "No content to save."));
    }

    let cover = match req.cover.filter(|c| !c.is_empty()) {
        Some(cover) => cover,
        None => {
            let cover_request = CoverRequest {
                subject: req.subject.clone(),
                topic: req.topic.clone(),
                style: "modern".to_string(),
            };
            state
                .cover_adapter
                .generate_cover(&cover_request)
                .await
                .unwrap_or_else(|e| {
                    warn!("Saving lesson without cover: {}", e);
                    String::new()
                })
        }
    };

    let lesson = NewLesson {
        owner: owner.0,
        persona: req.persona,
        subject: req.subject,
        topic: req.topic,
        grade: req.grade,
        language: req.language,
        html: req.html,
        plain_text: req.text,
        cover,
    };
    let id = state
        .lessons
        .create_lesson(lesson)
        .await
        .map_err(|e| store_error("Failed to save lesson", e))?;

    info!("Saved lesson {}", id);
    Ok((StatusCode::CREATED, Json(CreateLessonResponse { id })))
}

/// List the caller's saved lessons, newest first.
#[utoipa::path(
    get,
    path = "/api/lessons",
    responses(
        (status = 200, description = "Saved lessons", body = [LessonSummary]),
        (status = 400, description = "Missing owner header", body = ErrorResponse)
    ),
    params(
        ("x-user-id" = String, Header, description = "The owner of the lessons.")
    )
)]
pub async fn list_lessons_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Json<Vec<LessonSummary>>, HandlerError> {
    let lessons = state
        .lessons
        .list_lessons_by_owner(&owner.0)
        .await
        .map_err(|e| store_error("Failed to list lessons", e))?;
    Ok(Json(lessons.iter().map(LessonSummary::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/lessons/{id}",
    responses(
        (status = 200, description = "The saved lesson", body = SavedLessonResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "The lesson id."),
        ("x-user-id" = String, Header, description = "The owner of the lesson.")
    )
)]
pub async fn get_lesson_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SavedLessonResponse>, HandlerError> {
    let lesson = owned_lesson(&state, &owner, id).await?;
    Ok(Json(SavedLessonResponse::from(lesson)))
}

#[utoipa::path(
    delete,
    path = "/api/lessons/{id}",
    responses(
        (status = 204, description = "Lesson deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "The lesson id."),
        ("x-user-id" = String, Header, description = "The owner of the lesson.")
    )
)]
pub async fn delete_lesson_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, HandlerError> {
    owned_lesson(&state, &owner, id).await?;
    state
        .lessons
        .delete_lesson(id)
        .await
        .map_err(|e| store_error("Failed to delete lesson", e))?;
    info!("Deleted lesson {}", id);
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Export Handlers
//=========================================================================================

/// Download a saved lesson as a Word document.
#[utoipa::path(
    get,
    path = "/api/lessons/{id}/export/doc",
    responses(
        (status = 200, description = "Word document", body = String, content_type = "application/msword"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "The lesson id."),
        ("x-user-id" = String, Header, description = "The owner of the lesson.")
    )
)]
pub async fn export_lesson_doc_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let lesson = owned_lesson(&state, &owner, id).await?;
    let body = if lesson.html.trim().is_empty() {
        render_markdown(&lesson.plain_text)
    } else {
        lesson.html.clone()
    };
    let document = doc_document(&lesson.topic, &lesson.subject, &lesson.grade, &body);
    Ok(doc_attachment(&lesson.topic, document))
}

/// Export ad-hoc lesson HTML as a Word document.
#[utoipa::path(
    post,
    path = "/api/export/doc",
    request_body = DocExportRequest,
    responses(
        (status = 200, description = "Word document", body = String, content_type = "application/msword"),
        (status = 400, description = "Nothing to export", body = ErrorResponse)
    )
)]
pub async fn export_doc_handler(
    ApiJson(req): ApiJson<DocExportRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if req.html.trim().is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Nothing to export."));
    }
    let document = doc_document(&req.topic, &req.subject, &req.grade, &req.html);
    Ok(doc_attachment(&req.topic, document))
}

/// Lay out a saved lesson as a printable page with its stored cover.
#[utoipa::path(
    get,
    path = "/api/lessons/{id}/export/print",
    responses(
        (status = 200, description = "Printable HTML page", body = String, content_type = "text/html"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "The lesson id."),
        ("x-user-id" = String, Header, description = "The owner of the lesson.")
    )
)]
pub async fn export_lesson_print_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Html<String>, HandlerError> {
    let lesson = owned_lesson(&state, &owner, id).await?;
    let body = if lesson.html.trim().is_empty() {
        render_markdown(&lesson.plain_text)
    } else {
        lesson.html.clone()
    };
    let title = lesson.title();
    let generated_at = print_timestamp();
    let layout = PrintLayout {
        heading: "Saved Lesson",
        details: &[title.as_str(), lesson.grade.as_str()],
        cover: Some(lesson.cover.as_str()),
        generated_at: &generated_at,
    };
    Ok(Html(print_document(&layout, &body)))
}

/// Lay out ad-hoc lesson HTML as a printable page.
///
/// A cover is rendered when the request does not carry one.
#[utoipa::path(
    post,
    path = "/api/export/print",
    request_body = PrintExportRequest,
    responses(
        (status = 200, description = "Printable HTML page", body = String, content_type = "text/html"),
        (status = 400, description = "Nothing to export", body = ErrorResponse)
    )
)]
pub async fn export_print_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PrintExportRequest>,
) -> Result<Html<String>, HandlerError> {
    if req.html.trim().is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Nothing to export."));
    }

    let cover = match req.cover.filter(|c| !c.is_empty()) {
        Some(cover) => Some(cover),
        None => {
            let cover_request = CoverRequest {
                subject: req.subject.clone(),
                topic: req.topic.clone(),
                style: "modern".to_string(),
            };
            match state.cover_adapter.generate_cover(&cover_request).await {
                Ok(cover) => Some(cover),
                Err(e) => {
                    warn!("Printing lesson without cover: {}", e);
                    None
                }
            }
        }
    };

    let generated_at = print_timestamp();
    let layout = PrintLayout {
        heading: &req.topic,
        details: &[req.subject.as_str(), req.grade.as_str(), req.duration.as_str()],
        cover: cover.as_deref(),
        generated_at: &generated_at,
    };
    Ok(Html(print_document(&layout, &req.html)))
}

fn print_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M UTC").to_string()
}
