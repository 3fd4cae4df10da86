/// User CRUD REST endpoints
///
/// One datastore operation per request against the shared client in
/// [`AppState`]. Bodies are parsed and validated before the store is touched.

use crate::{
    api::error::ApiError,
    user::{User, UserPayload, UserProperties, UserStorage},
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Kind-scoped user storage over the pooled datastore client
    pub users: UserStorage,
}

/// Create user management routes
pub fn create_user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/users", get(list_users))
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}", put(update_user))
        .route("/users/{id}", delete(delete_user))
}

/// List all users
///
/// GET / and GET /users
/// Returns: [{ "id": "...", "firstName": "...", "lastName": "...", "email": "..." }]
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.users.list_users().await?;
    tracing::debug!("Listed {} users", users.len());
    Ok(Json(users))
}

/// Create a user under a store-assigned key
///
/// POST /users
/// Body: { "firstName": "...", "lastName": "...", "email": "..." }
/// Returns: 200 with an empty body
async fn create_user(State(state): State<AppState>, body: Bytes) -> Result<StatusCode, ApiError> {
    let properties = parse_payload(&body)?;
    let key = state.users.create_user(&properties).await?;

    tracing::info!("🔥 Created user {}", key);

    Ok(StatusCode::OK)
}

/// Get a user by ID
///
/// GET /users/{id}
async fn get_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&raw_id)?;
    tracing::debug!("Looking up user {}", id);

    match state.users.get_user(id).await? {
        Some(user) => Ok(Json(user)),
        None => Err(ApiError::NotFound(id)),
    }
}

/// Overwrite all three fields of an existing user
///
/// PUT /users/{id}
/// Body: { "firstName": "...", "lastName": "...", "email": "..." }
/// Returns: "User with ID = {id} was updated"
async fn update_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<String, ApiError> {
    let id = parse_id(&raw_id)?;
    let properties = parse_payload(&body)?;

    match state.users.update_user(id, properties).await? {
        Some(_) => {
            tracing::info!("Updated user {}", id);
            Ok(format!("User with ID = {} was updated", id))
        }
        None => Err(ApiError::NotFound(id)),
    }
}

/// Delete a user
///
/// DELETE /users/{id}
/// Returns: "User with ID = {id} was deleted"
async fn delete_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<String, ApiError> {
    let id = parse_id(&raw_id)?;

    if state.users.delete_user(id).await? {
        tracing::info!("Deleted user {}", id);
        Ok(format!("User with ID = {} was deleted", id))
    } else {
        Err(ApiError::NotFound(id))
    }
}

/// Keys are positive integers assigned by the store
///
/// Only the canonical decimal form is accepted (no sign, no leading zeros),
/// so the id echoed back always matches the path segment.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    let canonical = !raw.is_empty()
        && !raw.starts_with('0')
        && raw.bytes().all(|b| b.is_ascii_digit());

    match raw.parse::<i64>() {
        Ok(id) if canonical => Ok(id),
        _ => Err(ApiError::InvalidId(raw.to_string())),
    }
}

// Parse JSON manually so malformed bodies get our error shape, not the extractor's
fn parse_payload(body: &[u8]) -> Result<UserProperties, ApiError> {
    let payload: UserPayload =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    Ok(payload.validate()?)
}
