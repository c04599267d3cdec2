use crate::domain::scope::ScopeStructure;
use crate::infra::config;
use crate::transport::http::handlers::{columns, health, records};
use crate::transport::http::types::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        records::list_records_handler,
        records::create_record_handler,
        records::read_record_handler,
        records::update_record_handler,
        records::delete_record_handler,
        columns::read_column_handler
    ),
    components(schemas(ScopeStructure))
)]
pub struct ApiDoc;

/// Builds the fixed dispatcher routes under the versioned base path.
///
/// Every scope is served by the same handler set; the scope is resolved by
/// name at request time, so no per-scope routes are constructed.
pub fn create_router(app_state: AppState) -> Router {
    let scope_routes = Router::new()
        .route(
            "/:scope",
            get(records::list_records_handler).post(records::create_record_handler),
        )
        .route(
            "/:scope/",
            get(records::list_records_handler).post(records::create_record_handler),
        )
        .route(
            "/:scope/:key",
            get(records::read_record_handler)
                .patch(records::update_record_handler)
                .delete(records::delete_record_handler),
        )
        .route("/:scope/:key/:column", get(columns::read_column_handler));

    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .nest(&config::base_path(), scope_routes)
        .with_state(app_state)
}
