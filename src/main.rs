/// usersvc: user CRUD service
///
/// Main entry point. Loads configuration from the environment and starts the
/// HTTP server.

use usersvc::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - User CRUD at / and /users/*
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:8080, project "rx-dsmode")
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
