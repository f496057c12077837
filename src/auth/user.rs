//! # User Management
//!
//! User model and repository for authentication.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::crypto::{hash_password, verify_password};
use super::errors::{AuthError, AuthResult};
use super::validate::{Field, ValidationErrors};

/// Message shown when a username is taken
pub const USER_EXISTS: &str = "That user already exists.";

/// User model
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Store-assigned identifier, carried in the session cookie
    pub id: u64,

    /// Unique display name; also the author stamp on posts and comments
    pub name: String,

    /// `"<salt>|<digest>"` (never plaintext, never serialized)
    #[serde(skip_serializing)]
    pub credential: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub created: DateTime<Utc>,
}

impl User {
    /// Verify a password against this user's stored credential
    pub fn verify_password(&self, password: &str) -> bool {
        verify_password(&self.name, password, &self.credential)
    }
}

/// A user that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub credential: String,
    pub email: Option<String>,
}

impl NewUser {
    /// Derive the credential for a registration
    pub fn register(name: &str, password: &str, email: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            credential: hash_password(name, password),
            email,
        }
    }
}

/// User repository trait
///
/// Abstracts storage operations for users. Every lookup is by key.
pub trait UserRepository: Send + Sync {
    /// Find a user by their ID
    fn find_by_id(&self, id: u64) -> AuthResult<Option<User>>;

    /// Find a user by their name
    fn find_by_name(&self, name: &str) -> AuthResult<Option<User>>;

    /// Check if a name is already registered
    fn name_exists(&self, name: &str) -> AuthResult<bool>;

    /// Store a new user and assign its ID
    fn create(&self, user: NewUser) -> AuthResult<User>;

    /// Replace a user's credential
    fn update_credential(&self, id: u64, credential: String) -> AuthResult<()>;
}

#[derive(Debug, Default)]
struct UserTable {
    users: BTreeMap<u64, User>,
    last_id: u64,
}

/// In-memory user repository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_id(&self, id: u64) -> AuthResult<Option<User>> {
        let table = self.table.read().map_err(|_| AuthError::lock_poisoned())?;
        Ok(table.users.get(&id).cloned())
    }

    fn find_by_name(&self, name: &str) -> AuthResult<Option<User>> {
        let table = self.table.read().map_err(|_| AuthError::lock_poisoned())?;
        Ok(table.users.values().find(|u| u.name == name).cloned())
    }

    fn name_exists(&self, name: &str) -> AuthResult<bool> {
        let table = self.table.read().map_err(|_| AuthError::lock_poisoned())?;
        Ok(table.users.values().any(|u| u.name == name))
    }

    fn create(&self, user: NewUser) -> AuthResult<User> {
        let mut table = self.table.write().map_err(|_| AuthError::lock_poisoned())?;

        if table.users.values().any(|u| u.name == user.name) {
            return Err(AuthError::Validation(ValidationErrors::single(
                Field::Username,
                USER_EXISTS,
            )));
        }

        table.last_id += 1;
        let stored = User {
            id: table.last_id,
            name: user.name,
            credential: user.credential,
            email: user.email,
            created: Utc::now(),
        };
        table.users.insert(stored.id, stored.clone());

        Ok(stored)
    }

    fn update_credential(&self, id: u64, credential: String) -> AuthResult<()> {
        let mut table = self.table.write().map_err(|_| AuthError::lock_poisoned())?;

        match table.users.get_mut(&id) {
            Some(user) => {
                user.credential = credential;
                Ok(())
            }
            None => Err(AuthError::NotFound(format!("User {}", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_derives_credential() {
        let user = NewUser::register("alice", "secret1", None);

        assert!(!user.credential.is_empty());
        assert!(!user.credential.contains("secret1"));
    }

    #[test]
    fn test_in_memory_repository() {
        let repo = InMemoryUserRepository::new();

        let alice = repo.create(NewUser::register("alice", "secret1", None)).unwrap();
        let bob = repo
            .create(NewUser::register("bob", "hunter2", Some("bob@example.com".into())))
            .unwrap();
        assert_ne!(alice.id, bob.id);

        let found = repo.find_by_id(alice.id).unwrap().unwrap();
        assert_eq!(found.name, "alice");
        assert!(found.verify_password("secret1"));
        assert!(!found.verify_password("secret2"));

        assert!(repo.find_by_name("bob").unwrap().is_some());
        assert!(repo.find_by_name("carol").unwrap().is_none());
        assert!(repo.name_exists("alice").unwrap());
        assert!(!repo.name_exists("Alice").unwrap());
        assert!(repo.find_by_id(999).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(NewUser::register("alice", "secret1", None)).unwrap();

        let result = repo.create(NewUser::register("alice", "other", None));
        match result {
            Err(AuthError::Validation(errors)) => {
                assert_eq!(errors.get(Field::Username), Some(USER_EXISTS));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_update_credential() {
        let repo = InMemoryUserRepository::new();
        let alice = repo.create(NewUser::register("alice", "secret1", None)).unwrap();

        let replacement = NewUser::register("alice", "newpass", None).credential;
        repo.update_credential(alice.id, replacement).unwrap();

        let found = repo.find_by_id(alice.id).unwrap().unwrap();
        assert!(found.verify_password("newpass"));
        assert!(!found.verify_password("secret1"));

        assert!(matches!(
            repo.update_credential(99, "x|y".into()),
            Err(AuthError::NotFound(_))
        ));
    }

    #[test]
    fn test_user_serialization_omits_credential() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(NewUser::register("alice", "secret1", None)).unwrap();

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("credential"));
        assert!(!json.contains(&user.credential));
    }
}
