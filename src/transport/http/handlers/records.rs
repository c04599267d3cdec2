use crate::domain::scope::ScopeStructure;
use crate::transport::http::handlers::common::{
    unescape_segment, RecordPayload, SCOPES_PSEUDO_SEGMENT, STRUCTURE_PSEUDO_KEY,
};
use crate::transport::http::types::{AppState, ListQuery};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{Map, Value as JsonValue};
use tracing::error;

#[utoipa::path(
    get,
    path = "/api/v1/{scope}",
    params(
        ("scope" = String, Path, description = "Scope name, or `:scopes` to list every scope name"),
        ("from" = Option<usize>, Query, description = "Offset into the insertion-ordered record set (default 0)"),
        ("count" = Option<usize>, Query, description = "Maximum number of records to return (default unlimited)")
    ),
    responses(
        (status = 200, description = "Key-to-record map in insertion order, or the scope name array"),
        (status = 404, description = "Unknown scope")
    )
)]
pub async fn list_records_handler(
    State(state): State<AppState>,
    Path(scope): Path<String>,
    Query(page): Query<ListQuery>,
) -> impl IntoResponse {
    let registry = state.registry.read().await;

    if scope == SCOPES_PSEUDO_SEGMENT {
        let names: Vec<String> = registry
            .scope_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        return Json(names).into_response();
    }

    let name = unescape_segment(&scope);
    let Some(values) = registry.get_all(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    // TODO: filter by field value
    let count = page.count.unwrap_or(usize::MAX);
    let slice: Map<String, JsonValue> = values
        .iter()
        .skip(page.from)
        .take(count)
        .map(|(key, record)| (key.clone(), record.clone()))
        .collect();

    Json(JsonValue::Object(slice)).into_response()
}

#[utoipa::path(
    post,
    path = "/api/v1/{scope}",
    params(
        ("scope" = String, Path, description = "Scope name")
    ),
    responses(
        (status = 204, description = "Record created"),
        (status = 404, description = "Unknown scope"),
        (status = 422, description = "Missing primary key field, or no declared column present"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn create_record_handler(
    State(state): State<AppState>,
    Path(scope): Path<String>,
    RecordPayload(fields): RecordPayload,
) -> StatusCode {
    let name = unescape_segment(&scope);
    let mut registry = state.registry.write().await;
    if registry.resolve(&name).is_none() {
        return StatusCode::NOT_FOUND;
    }

    match registry.add_one(&name, &fields) {
        Ok(true) => StatusCode::NO_CONTENT,
        Ok(false) => StatusCode::UNPROCESSABLE_ENTITY,
        Err(error) => {
            error!(scope = %name, %error, "failed to persist scope after create");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/{scope}/{key}",
    params(
        ("scope" = String, Path, description = "Scope name"),
        ("key" = String, Path, description = "Record key (`+` decodes to space), or `:structure` for the scope metadata")
    ),
    responses(
        (status = 200, description = "The record, or the scope structure", body = ScopeStructure),
        (status = 404, description = "Unknown scope or no record at the key")
    )
)]
pub async fn read_record_handler(
    State(state): State<AppState>,
    Path((scope, key)): Path<(String, String)>,
) -> impl IntoResponse {
    let registry = state.registry.read().await;

    let name = unescape_segment(&scope);
    let Some(scope) = registry.resolve(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if key == STRUCTURE_PSEUDO_KEY {
        return Json(scope.structure()).into_response();
    }

    let key = unescape_segment(&key);
    match scope.values.get(&key) {
        Some(record) => Json(record).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/{scope}/{key}",
    params(
        ("scope" = String, Path, description = "Scope name"),
        ("key" = String, Path, description = "Record key")
    ),
    responses(
        (status = 204, description = "Record updated"),
        (status = 404, description = "Unknown scope or no record at the key"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn update_record_handler(
    State(state): State<AppState>,
    Path((scope, key)): Path<(String, String)>,
    RecordPayload(fields): RecordPayload,
) -> StatusCode {
    let name = unescape_segment(&scope);
    let key = unescape_segment(&key);

    let mut registry = state.registry.write().await;
    match registry.edit_one(&name, &key, &fields) {
        Ok(true) => StatusCode::NO_CONTENT,
        Ok(false) => StatusCode::NOT_FOUND,
        Err(error) => {
            error!(scope = %name, %error, "failed to persist scope after update");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/{scope}/{key}",
    params(
        ("scope" = String, Path, description = "Scope name"),
        ("key" = String, Path, description = "Record key")
    ),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Unknown scope or no record at the key"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn delete_record_handler(
    State(state): State<AppState>,
    Path((scope, key)): Path<(String, String)>,
) -> StatusCode {
    let name = unescape_segment(&scope);
    let key = unescape_segment(&key);

    let mut registry = state.registry.write().await;
    match registry.remove_one(&name, &key) {
        Ok(true) => StatusCode::NO_CONTENT,
        Ok(false) => StatusCode::NOT_FOUND,
        Err(error) => {
            error!(scope = %name, %error, "failed to persist scope after delete");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
