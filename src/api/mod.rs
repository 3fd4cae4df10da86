/// HTTP API Layer
///
/// This module provides the REST surface of the service:
/// - User CRUD endpoints
/// - CORS decorator wrapping every route
/// - Structured error responses

// User management endpoints (GET/POST/PUT/DELETE)
pub mod users;

// Cross-origin headers and preflight short-circuit
pub mod cors;

// ApiError and its JSON rendering
pub mod error;

pub use cors::cors_decorator;
pub use error::ApiError;
pub use users::{create_user_routes, AppState};
