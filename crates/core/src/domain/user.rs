use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity as known to the user store. Credentials never leave the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// A fresh account with a generated id. Username and email are trimmed;
    /// the username must be non-blank and the email must contain `@`.
    pub fn new(username: &str, email: &str) -> Result<Self, DomainError> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() {
            return Err(DomainError::InvariantViolation("username must not be blank".to_string()));
        }
        if !email.contains('@') {
            return Err(DomainError::InvariantViolation(format!(
                "email `{email}` is not an address"
            )));
        }

        Ok(Self {
            id: UserId::generate(),
            username: username.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        })
    }
}
