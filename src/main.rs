use anyhow::Context;
use scopestore::app::seed;
use scopestore::domain::scope::catalog;
use scopestore::infra::config;
use scopestore::transport::http::{create_router, ApiDoc, AppState};
use scopestore::{BlobStore, ScopeRegistry};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let data_dir = config::data_dir();
    let store = BlobStore::open(&data_dir)
        .with_context(|| format!("opening blob store at {}", data_dir.display()))?;
    let mut registry = ScopeRegistry::open(store, catalog::default_scopes())
        .context("loading persisted scopes")?;
    info!(
        scopes = registry.scope_names().len(),
        data_dir = %data_dir.display(),
        "scope registry loaded"
    );

    if seed::wants_demo_data(&registry) {
        seed::generate_demo_data(&mut registry).context("generating demo data")?;
    }

    let app_state = AppState {
        registry: Arc::new(RwLock::new(registry)),
    };

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(ServeDir::new(config::public_dir()))
        .layer(cors);

    let port = config::port();
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "server is running");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}
