use crate::transport::http::handlers::common::unescape_segment;
use crate::transport::http::types::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/v1/{scope}/{key}/{column}",
    params(
        ("scope" = String, Path, description = "Scope name"),
        ("key" = String, Path, description = "Record key"),
        ("column" = String, Path, description = "Column name")
    ),
    responses(
        (status = 200, description = "The single field value of the addressed record"),
        (status = 404, description = "Unknown scope, no record at the key, or the record has no such field")
    )
)]
pub async fn read_column_handler(
    State(state): State<AppState>,
    Path((scope, key, column)): Path<(String, String, String)>,
) -> impl IntoResponse {
    let registry = state.registry.read().await;

    let name = unescape_segment(&scope);
    let key = unescape_segment(&key);
    let column = unescape_segment(&column);

    let Some(record) = registry.get_one(&name, &key) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match record.get(&column) {
        Some(value) => Json(value).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
