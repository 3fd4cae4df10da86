/// Server setup and initialization
///
/// Wires together the datastore client, user storage, HTTP routes and the
/// CORS decorator.

use crate::{
    api::{cors_decorator, create_user_routes, ApiError, AppState},
    config::Config,
    datastore::DatastoreClient,
    user::UserStorage,
};
use anyhow::Result;
use axum::{http::Uri, middleware, routing::get, Router};
use tokio::net::TcpListener;

/// Create the main Axum application
///
/// Opens the project datastore once; the pooled client is shared by every request.
pub async fn create_app(config: Config) -> Result<Router> {
    tracing::info!("🏗️ Connecting datastore client (project '{}')", config.datastore.project);
    let client = DatastoreClient::connect(&config.datastore)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open datastore: {}", e))?;

    tracing::info!("📋 Storing users under kind '{}'", config.datastore.kind);
    let state = AppState {
        users: UserStorage::new(client, config.datastore.kind.clone()),
    };

    let app = build_router(state);
    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Assemble routes and wrap them in the CORS decorator
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .merge(create_user_routes())
        .fallback(route_not_found)
        .with_state(state)
        .layer(middleware::from_fn(cors_decorator))
}

/// Start the HTTP server with the given configuration
pub async fn start_server(config: Config) -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting user service...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}
