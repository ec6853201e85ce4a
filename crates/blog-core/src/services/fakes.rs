//! Minimal in-process port implementations for service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewUser, Post, User, UserCredentials};
use crate::error::RepoError;
use crate::ports::{
    AuthError, BaseRepository, ImageStore, ImageUpload, PasswordService, PostRepository,
    StorageError, UserRepository,
};

#[derive(Default)]
pub struct FakeUserRepository {
    users: Mutex<Vec<UserCredentials>>,
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|c| c.user.username == user.username) {
            return Err(RepoError::Constraint("username".to_string()));
        }
        let public = user.to_user();
        users.push(UserCredentials {
            user: public.clone(),
            password_hash: user.password_hash,
        });
        Ok(public)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|c| c.user.id == id).map(|c| c.user.clone()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|c| c.user.username == username)
            .map(|c| c.user.clone()))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|c| ids.contains(&c.user.id))
            .map(|c| c.user.clone())
            .collect())
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, RepoError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|c| c.user.username == username).cloned())
    }
}

#[derive(Default)]
pub struct FakePostRepository {
    posts: Mutex<HashMap<Uuid, Post>>,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for FakePostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.posts.lock().unwrap().insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.lock().unwrap();
        match posts.get_mut(&post.id) {
            Some(existing) => {
                *existing = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.posts
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for FakePostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.posts.lock().unwrap().values().cloned().collect())
    }
}

/// Reads succeed against seeded posts; every write fails.
#[derive(Default)]
pub struct FailingPostRepository {
    posts: Mutex<HashMap<Uuid, Post>>,
}

impl FailingPostRepository {
    pub fn seed(&self, post: Post) {
        self.posts.lock().unwrap().insert(post.id, post);
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for FailingPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, _post: Post) -> Result<Post, RepoError> {
        Err(RepoError::Query("connection reset".to_string()))
    }

    async fn update(&self, _post: Post) -> Result<Post, RepoError> {
        Err(RepoError::Query("connection reset".to_string()))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        Err(RepoError::Query("connection reset".to_string()))
    }
}

#[async_trait]
impl PostRepository for FailingPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.posts.lock().unwrap().values().cloned().collect())
    }
}

/// Stores nothing; hands out sequential names and records removals.
#[derive(Default)]
pub struct FakeImageStore {
    saved: Mutex<usize>,
    removed: Mutex<Vec<String>>,
}

impl FakeImageStore {
    pub fn saved(&self) -> usize {
        *self.saved.lock().unwrap()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for FakeImageStore {
    async fn save(&self, _upload: ImageUpload) -> Result<String, StorageError> {
        let mut saved = self.saved.lock().unwrap();
        *saved += 1;
        Ok(format!("stored-{saved}.png"))
    }

    async fn remove(&self, file_name: &str) -> Result<(), StorageError> {
        self.removed.lock().unwrap().push(file_name.to_string());
        Ok(())
    }
}

/// Stores passwords reversed; fast enough for unit tests.
pub struct PlainPasswordService;

impl PasswordService for PlainPasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(password.chars().rev().collect())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(password.chars().rev().collect::<String>() == hash)
    }
}
