pub mod rest;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, get, patch},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use crate::{error, service::NoteService};

pub fn router(service: Arc<NoteService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", any(root))
        .route(
            "/notepads",
            get(rest::get_all_notes).post(rest::create_note),
        )
        .route("/notepads/active", get(rest::get_active_notes))
        .route("/notepads/archived", get(rest::get_archived_notes))
        .route("/notepads/search", get(rest::search_notes))
        .route("/notepads/search/title", get(rest::search_by_title))
        .route("/notepads/search/content", get(rest::search_by_content))
        .route("/notepads/created-after", get(rest::get_notes_created_after))
        .route("/notepads/updated-after", get(rest::get_notes_updated_after))
        .route("/notepads/stats", get(rest::get_stats))
        .route("/notepads/health", get(rest::health_check))
        .route(
            "/notepads/{id}",
            get(rest::get_one_note)
                .put(rest::update_note)
                .delete(rest::delete_note),
        )
        .route("/notepads/{id}/toggle-archive", patch(rest::toggle_archive))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .with_state(service)
        .layer(cors)
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Response {
    (StatusCode::OK, "Hello from the notepad server!").into_response()
}
