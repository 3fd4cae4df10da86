/// User record definitions
///
/// `User` is what the API returns, `UserProperties` is what the datastore
/// holds under each key, and `UserPayload` is the unvalidated request body.

use crate::datastore::Key;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A user as exposed over HTTP
///
/// `id` is the decimal encoding of the datastore key and is never stored
/// among the entity properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl User {
    /// Attach the decoded key to stored properties
    pub fn from_entity(key: &Key, properties: UserProperties) -> Self {
        Self {
            id: key.encoded_id(),
            first_name: properties.first_name,
            last_name: properties.last_name,
            email: properties.email,
        }
    }
}

/// Stored properties of a user entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProperties {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Request body for create and update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("email '{0}' is not a valid address")]
    InvalidEmail(String),
}

impl UserPayload {
    /// Trim and check every field, producing the properties to store
    pub fn validate(self) -> Result<UserProperties, ValidationError> {
        let first_name = required("firstName", &self.first_name)?;
        let last_name = required("lastName", &self.last_name)?;
        let email = required("email", &self.email)?;

        let well_formed = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
            None => false,
        };
        if !well_formed {
            return Err(ValidationError::InvalidEmail(email));
        }

        Ok(UserProperties {
            first_name,
            last_name,
            email,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}
