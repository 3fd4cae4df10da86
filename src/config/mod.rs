/// Configuration management for the user service
///
/// Handles server bind settings and the project-scoped datastore parameters.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Datastore configuration
    pub datastore: DatastoreConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Datastore configuration for project-scoped storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreConfig {
    /// Base directory for all project stores (default: "data")
    /// Creates: {data_dir}/{project}/datastore.db
    pub data_dir: String,
    /// Project the datastore client is scoped to
    pub project: String,
    /// Record kind User entities are stored under.
    /// Set to "Task" to read records written under the legacy kind.
    pub kind: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("USERSVC_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("USERSVC_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .unwrap_or(8080),
            },
            datastore: DatastoreConfig {
                data_dir: std::env::var("USERSVC_DATA_DIR")
                    .unwrap_or_else(|_| "data".to_string()),
                project: std::env::var("USERSVC_PROJECT")
                    .unwrap_or_else(|_| "rx-dsmode".to_string()),
                kind: std::env::var("USERSVC_KIND").unwrap_or_else(|_| "User".to_string()),
                max_connections: std::env::var("USERSVC_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|n| *n > 0)
                    .unwrap_or(5),
            },
        }
    }
}
