use crate::transport::http::types::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.registry.read().await;
    Json(serde_json::json!({
        "status": "ok",
        "scopes": registry.scope_names().len()
    }))
}
