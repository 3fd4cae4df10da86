/// User domain
///
/// The single record type this service manages and its persistence:
/// - Type definitions and request validation
/// - Kind-scoped storage over the datastore client

pub mod types;

pub mod storage;

pub use storage::UserStorage;
pub use types::{User, UserPayload, UserProperties, ValidationError};
