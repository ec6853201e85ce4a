//! Account registration and credential checks.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewUser, Role, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, UserRepository};

/// Credential store operations on top of [`UserRepository`] and
/// [`PasswordService`].
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Create an account, hashing `password` before it is stored.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User, DomainError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::Validation("Username is required".to_string()));
        }
        if password.is_empty() {
            return Err(DomainError::Validation("Password is required".to_string()));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::Duplicate("Username already exists".to_string()));
        }

        let password_hash = self.passwords.hash(password)?;
        let record = NewUser::new(username.to_string(), password_hash, role);

        // The unique index still catches a concurrent registration.
        let user = self.users.create(record).await.map_err(|e| match e {
            RepoError::Constraint(_) => DomainError::Duplicate("Username already exists".to_string()),
            other => other.into(),
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    /// Check a username/password pair. Unknown users and wrong passwords are
    /// reported identically.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let Some(credentials) = self.users.find_credentials(username.trim()).await? else {
            tracing::debug!(username = %username, "Login attempt for unknown user");
            return Err(DomainError::InvalidCredentials);
        };

        if !self.passwords.verify(password, &credentials.password_hash)? {
            tracing::debug!(username = %username, "Login attempt with wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        Ok(credentials.user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity_type: "User", id })
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_username(username.trim()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fakes::{FakeUserRepository, PlainPasswordService};

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(FakeUserRepository::default()),
            Arc::new(PlainPasswordService),
        )
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_username() {
        let accounts = service();

        let first = accounts.create_user("alice", "pw1", Role::Reader).await;
        assert!(first.is_ok());

        let second = accounts.create_user("alice", "other", Role::Reader).await;
        assert!(matches!(second, Err(DomainError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_create_user_requires_username_and_password() {
        let accounts = service();

        assert!(matches!(
            accounts.create_user("   ", "pw", Role::Admin).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            accounts.create_user("bob", "", Role::Admin).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let accounts = service();
        let created = accounts.create_user("alice", "pw1", Role::Admin).await.unwrap();

        let user = accounts.authenticate("alice", "pw1").await.unwrap();
        assert_eq!(user.id, created.id);
        assert_eq!(user.role, Role::Admin);

        assert!(matches!(
            accounts.authenticate("alice", "wrong").await,
            Err(DomainError::InvalidCredentials)
        ));
        assert!(matches!(
            accounts.authenticate("nobody", "pw1").await,
            Err(DomainError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_find_by_id_missing_user() {
        let accounts = service();
        let result = accounts.find_by_id(Uuid::new_v4()).await;

        assert!(matches!(result, Err(DomainError::NotFound { entity_type: "User", .. })));
    }
}
