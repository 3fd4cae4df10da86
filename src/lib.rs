/// usersvc: minimal user CRUD service
///
/// Five REST operations on a single User record type, persisted in a
/// project-scoped document store, with a CORS decorator around the router.

// Core configuration and setup
pub mod config;

// Document store layer - pooled project-scoped client, keys, transactions
pub mod datastore;

// User domain - record types, validation and kind-scoped storage
pub mod user;

// HTTP API layer - REST endpoints, CORS decorator, error responses
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use api::AppState;
pub use datastore::{DatastoreClient, Key};
pub use server::{build_router, create_app, start_server};
pub use user::{User, UserStorage};
