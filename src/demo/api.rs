//! The external API the demo effects call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub name: String,
    pub completed: bool,
    /// Due date in milliseconds since the Unix epoch.
    pub due_by: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Sign-in rejected: {reason}")]
    SignInRejected { reason: String },
}

/// Remote operations available to effects.
#[async_trait]
pub trait Api: Send + Sync {
    async fn get_todos(&self) -> Result<Vec<Todo>, ApiError>;

    async fn sign_in(&self, username: &str) -> Result<User, ApiError>;
}

/// Canned in-memory responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureApi;

#[async_trait]
impl Api for FixtureApi {
    async fn get_todos(&self) -> Result<Vec<Todo>, ApiError> {
        Ok(vec![
            Todo {
                name: "Test Todo 1".to_string(),
                completed: false,
                due_by: 24023,
            },
            Todo {
                name: "Test Todo 2".to_string(),
                completed: true,
                due_by: 563048,
            },
        ])
    }

    async fn sign_in(&self, username: &str) -> Result<User, ApiError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::SignInRejected {
                reason: "username is empty".to_string(),
            });
        }
        Ok(User {
            username: username.to_string(),
            email: format!("{}@example.com", username.to_lowercase()),
        })
    }
}
