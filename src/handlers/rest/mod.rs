use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::{FromRequest, FromRequestParts, debug_handler};
use chrono::{DateTime, NaiveDateTime, Utc};
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{
        ContentSearchQuery, DateQuery, ErrorResponse, HealthResponse, NoteRequest, NoteResponse,
        SearchQuery, StatsResponse, TitleSearchQuery,
    },
    error::ApiError,
    service::NoteService,
};

type HandlerResult = Result<Response, ApiError>;

// Extractors whose rejections render through `ApiError` instead of axum's plain-text bodies.

#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(OpenApi)]
#[openapi(
    paths(
        get_all_notes,
        get_active_notes,
        get_archived_notes,
        get_one_note,
        create_note,
        update_note,
        toggle_archive,
        delete_note,
        search_notes,
        search_by_title,
        search_by_content,
        get_notes_created_after,
        get_notes_updated_after,
        get_stats,
        health_check
    ),
    components(schemas(
        NoteResponse,
        NoteRequest,
        StatsResponse,
        HealthResponse,
        ErrorResponse
    )),
    tags(
        (name = "notepads", description = "Notepad management API")
    )
)]
pub struct ApiDoc;

/// Accepts RFC 3339 timestamps, or a local date-time without offset (seconds
/// optional) which is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
        .map(|ts| ts.and_utc())
}

fn require_timestamp(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    parse_timestamp(raw).ok_or_else(|| ApiError::BadRequest(format!("invalid date '{raw}'")))
}

#[utoipa::path(
    get,
    path = "/notepads",
    responses(
        (status = 200, description = "List of all notepads", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> HandlerResult {
    let notes = service.get_all_notes().await?;
    Ok((StatusCode::OK, Json(notes)).into_response())
}

#[utoipa::path(
    get,
    path = "/notepads/active",
    responses(
        (status = 200, description = "Notepads that are not archived", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn get_active_notes(State(service): State<Arc<NoteService>>) -> HandlerResult {
    let notes = service.get_active_notes().await?;
    Ok((StatusCode::OK, Json(notes)).into_response())
}

#[utoipa::path(
    get,
    path = "/notepads/archived",
    responses(
        (status = 200, description = "Archived notepads", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn get_archived_notes(State(service): State<Arc<NoteService>>) -> HandlerResult {
    let notes = service.get_archived_notes().await?;
    Ok((StatusCode::OK, Json(notes)).into_response())
}

#[utoipa::path(
    get,
    path = "/notepads/{id}",
    params(
        ("id" = i64, Path, description = "Notepad ID")
    ),
    responses(
        (status = 200, description = "Notepad found", body = NoteResponse),
        (status = 404, description = "Notepad not found"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    ApiPath(id): ApiPath<i64>,
) -> HandlerResult {
    let note = service.get_one_note(id).await?.ok_or(ApiError::NotFound)?;
    Ok((StatusCode::OK, Json(note)).into_response())
}

#[utoipa::path(
    post,
    path = "/notepads",
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Notepad created successfully", body = NoteResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    ApiJson(payload): ApiJson<NoteRequest>,
) -> HandlerResult {
    let note = service.create_note(payload).await?;
    Ok((StatusCode::CREATED, Json(note)).into_response())
}

#[utoipa::path(
    put,
    path = "/notepads/{id}",
    params(
        ("id" = i64, Path, description = "Notepad ID")
    ),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Notepad updated successfully", body = NoteResponse),
        (status = 404, description = "Notepad not found"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NoteRequest>,
) -> HandlerResult {
    let note = service
        .update_note(id, payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok((StatusCode::OK, Json(note)).into_response())
}

#[utoipa::path(
    patch,
    path = "/notepads/{id}/toggle-archive",
    params(
        ("id" = i64, Path, description = "Notepad ID")
    ),
    responses(
        (status = 200, description = "Archive flag flipped", body = NoteResponse),
        (status = 404, description = "Notepad not found"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn toggle_archive(
    State(service): State<Arc<NoteService>>,
    ApiPath(id): ApiPath<i64>,
) -> HandlerResult {
    let note = service
        .toggle_archive(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok((StatusCode::OK, Json(note)).into_response())
}

#[utoipa::path(
    delete,
    path = "/notepads/{id}",
    params(
        ("id" = i64, Path, description = "Notepad ID")
    ),
    responses(
        (status = 204, description = "Notepad deleted successfully"),
        (status = 404, description = "Notepad not found"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    ApiPath(id): ApiPath<i64>,
) -> HandlerResult {
    if service.delete_note(id).await? {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Err(ApiError::NotFound)
    }
}

#[utoipa::path(
    get,
    path = "/notepads/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Notepads whose title or content contains the term", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn search_notes(
    State(service): State<Arc<NoteService>>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> HandlerResult {
    let notes = service.search_notes(&params.q).await?;
    Ok((StatusCode::OK, Json(notes)).into_response())
}

#[utoipa::path(
    get,
    path = "/notepads/search/title",
    params(TitleSearchQuery),
    responses(
        (status = 200, description = "Notepads whose title contains the term", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn search_by_title(
    State(service): State<Arc<NoteService>>,
    ApiQuery(params): ApiQuery<TitleSearchQuery>,
) -> HandlerResult {
    let notes = service.search_by_title(&params.title).await?;
    Ok((StatusCode::OK, Json(notes)).into_response())
}

#[utoipa::path(
    get,
    path = "/notepads/search/content",
    params(ContentSearchQuery),
    responses(
        (status = 200, description = "Notepads whose content contains the term", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn search_by_content(
    State(service): State<Arc<NoteService>>,
    ApiQuery(params): ApiQuery<ContentSearchQuery>,
) -> HandlerResult {
    let notes = service.search_by_content(&params.content).await?;
    Ok((StatusCode::OK, Json(notes)).into_response())
}

#[utoipa::path(
    get,
    path = "/notepads/created-after",
    params(DateQuery),
    responses(
        (status = 200, description = "Notepads created strictly after the date", body = Vec<NoteResponse>),
        (status = 400, description = "Malformed date"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn get_notes_created_after(
    State(service): State<Arc<NoteService>>,
    ApiQuery(params): ApiQuery<DateQuery>,
) -> HandlerResult {
    let date = require_timestamp(&params.date)?;
    let notes = service.get_notes_created_after(date).await?;
    Ok((StatusCode::OK, Json(notes)).into_response())
}

#[utoipa::path(
    get,
    path = "/notepads/updated-after",
    params(DateQuery),
    responses(
        (status = 200, description = "Notepads updated strictly after the date", body = Vec<NoteResponse>),
        (status = 400, description = "Malformed date"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn get_notes_updated_after(
    State(service): State<Arc<NoteService>>,
    ApiQuery(params): ApiQuery<DateQuery>,
) -> HandlerResult {
    let date = require_timestamp(&params.date)?;
    let notes = service.get_notes_updated_after(date).await?;
    Ok((StatusCode::OK, Json(notes)).into_response())
}

#[utoipa::path(
    get,
    path = "/notepads/stats",
    responses(
        (status = 200, description = "Notepad counts", body = StatsResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn get_stats(State(service): State<Arc<NoteService>>) -> HandlerResult {
    let stats = service.get_stats().await?;
    Ok((StatusCode::OK, Json(stats)).into_response())
}

#[utoipa::path(
    get,
    path = "/notepads/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "notepads"
)]
#[debug_handler]
pub async fn health_check() -> Response {
    let body = HealthResponse {
        status: "UP".to_string(),
        message: "Notepad API is running".to_string(),
    };
    (StatusCode::OK, Json(body)).into_response()
}
