use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewUser, Post, User, UserCredentials};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with [`RepoError::NotFound`] if it
    /// does not exist.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Credential store.
///
/// Lookups return the public [`User`]; the password hash is only reachable
/// through [`UserRepository::find_credentials`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account. A taken username yields [`RepoError::Constraint`].
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Fetch users by id, skipping unknown ids.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;

    /// Fetch a user together with the stored password hash.
    async fn find_credentials(&self, username: &str)
    -> Result<Option<UserCredentials>, RepoError>;
}

/// Post store.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts, newest first.
    async fn find_all(&self) -> Result<Vec<Post>, RepoError>;
}
