//! User directory trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::UserId;

use super::ServiceError;

/// A user record as returned by the user service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Trait for the user-lookup collaborator.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Looks up a user by email. `Ok(None)` means no such user.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError>;
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<String, User>,
    fail_lookups: bool,
}

/// In-memory user directory for tests and the demo server.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl InMemoryUserDirectory {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user and returns the stored record.
    pub fn insert(&self, name: impl Into<String>, email: impl Into<String>) -> User {
        let user = User {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
        };
        let mut state = self.state.write().unwrap();
        state.users.insert(user.email.clone(), user.clone());
        user
    }

    /// Configures lookups to fail with an `Unavailable` error.
    pub fn set_fail_lookups(&self, fail: bool) {
        self.state.write().unwrap().fail_lookups = fail;
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let state = self.state.read().unwrap();
        if state.fail_lookups {
            return Err(ServiceError::Unavailable(
                "user service unavailable".to_string(),
            ));
        }
        Ok(state.users.get(email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.insert("Alice", "a@b.com");

        let found = directory.find_user_by_email("a@b.com").await.unwrap();
        assert_eq!(found.unwrap().id, user.id);

        let missing = directory.find_user_by_email("x@y.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_fail_lookups() {
        let directory = InMemoryUserDirectory::new();
        directory.insert("Alice", "a@b.com");
        directory.set_fail_lookups(true);

        let result = directory.find_user_by_email("a@b.com").await;
        assert!(matches!(result, Err(ServiceError::Unavailable(_))));
    }
}
