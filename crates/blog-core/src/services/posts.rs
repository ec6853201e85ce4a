//! Post lifecycle: public reads, admin-only writes.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AuthorSummary, Category, Post, PostFields, PostWithAuthor, Principal};
use crate::error::{DomainError, RepoError};
use crate::ports::{ImageStore, ImageUpload, PostRepository, UserRepository};

/// CRUD over posts. Mutations require an admin [`Principal`].
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    images: Arc<dyn ImageStore>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            posts,
            users,
            images,
        }
    }

    /// The fixed category set.
    pub fn categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    pub async fn list(&self) -> Result<Vec<PostWithAuthor>, DomainError> {
        let posts = self.posts.find_all().await?;

        let mut author_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<Uuid, AuthorSummary> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    AuthorSummary {
                        id: u.id,
                        username: u.username,
                    },
                )
            })
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned();
                PostWithAuthor { post, author }
            })
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<PostWithAuthor, DomainError> {
        let post = self.find(id).await?;
        let author = self
            .users
            .find_by_id(post.author_id)
            .await?
            .map(|u| AuthorSummary {
                id: u.id,
                username: u.username,
            });

        Ok(PostWithAuthor { post, author })
    }

    /// Create a post authored by `principal`. Fields are validated before the
    /// image is stored.
    pub async fn create(
        &self,
        principal: &Principal,
        fields: PostFields,
        image: Option<ImageUpload>,
    ) -> Result<PostWithAuthor, DomainError> {
        ensure_admin(principal)?;

        let mut post = Post::create(principal.user_id, fields, None)?;
        let stored = match image {
            Some(upload) => Some(self.images.save(upload).await?),
            None => None,
        };
        if let Some(name) = &stored {
            post.image = name.clone();
        }

        let post = match self.posts.insert(post).await {
            Ok(post) => post,
            Err(e) => {
                self.discard_image(stored.as_deref()).await;
                return Err(e.into());
            }
        };
        tracing::info!(post_id = %post.id, slug = %post.slug, author = %principal.username, "Post created");

        Ok(PostWithAuthor {
            post,
            author: Some(AuthorSummary {
                id: principal.user_id,
                username: principal.username.clone(),
            }),
        })
    }

    /// Apply a partial update to an existing post.
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        fields: PostFields,
        image: Option<ImageUpload>,
    ) -> Result<PostWithAuthor, DomainError> {
        ensure_admin(principal)?;

        let mut post = self.find(id).await?;
        post.apply(fields)?;
        let stored = match image {
            Some(upload) => Some(self.images.save(upload).await?),
            None => None,
        };
        if let Some(name) = &stored {
            post.image = name.clone();
        }

        if let Err(e) = self.posts.update(post).await {
            self.discard_image(stored.as_deref()).await;
            return Err(not_found(e, id));
        }
        tracing::info!(post_id = %id, editor = %principal.username, "Post updated");

        self.get(id).await
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), DomainError> {
        ensure_admin(principal)?;

        self.posts.delete(id).await.map_err(|e| not_found(e, id))?;
        tracing::info!(post_id = %id, editor = %principal.username, "Post deleted");

        Ok(())
    }

    /// Best-effort removal of an image stored for a write that then failed.
    async fn discard_image(&self, stored: Option<&str>) {
        let Some(name) = stored else {
            return;
        };
        if let Err(e) = self.images.remove(name).await {
            tracing::warn!(file = %name, error = %e, "Failed to remove orphaned image");
        }
    }

    async fn find(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity_type: "Post", id })
    }
}

fn ensure_admin(principal: &Principal) -> Result<(), DomainError> {
    if principal.is_admin() {
        Ok(())
    } else {
        tracing::warn!(user_id = %principal.user_id, role = %principal.role, "Post mutation refused");
        Err(DomainError::Forbidden)
    }
}

fn not_found(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::NotFound { entity_type: "Post", id },
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_POST_IMAGE, NewUser, Role};
    use crate::services::fakes::{
        FailingPostRepository, FakeImageStore, FakePostRepository, FakeUserRepository,
    };

    struct Fixture {
        service: PostService,
        users: Arc<FakeUserRepository>,
        images: Arc<FakeImageStore>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(FakeUserRepository::default());
        let images = Arc::new(FakeImageStore::default());
        let service = PostService::new(
            Arc::new(FakePostRepository::default()),
            users.clone(),
            images.clone(),
        );
        Fixture {
            service,
            users,
            images,
        }
    }

    async fn admin(users: &FakeUserRepository) -> Principal {
        let user = users
            .create(NewUser::new("admin".to_string(), "x".to_string(), Role::Admin))
            .await
            .unwrap();
        Principal {
            user_id: user.id,
            username: user.username,
            role: user.role,
        }
    }

    fn phishing_fields() -> PostFields {
        PostFields {
            title: Some("New Phishing Scam!".to_string()),
            content: Some("Do not click the link.".to_string()),
            category: Some("Phishing".to_string()),
        }
    }

    fn upload() -> ImageUpload {
        ImageUpload {
            file_name: Some("scam.png".to_string()),
            content_type: Some("image/png".to_string()),
            bytes: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn test_create_and_read_post() {
        let fx = fixture();
        let principal = admin(&fx.users).await;

        let created = fx.service.create(&principal, phishing_fields(), None).await.unwrap();
        assert_eq!(created.post.slug, "new-phishing-scam");
        assert_eq!(created.post.image, DEFAULT_POST_IMAGE);

        let fetched = fx.service.get(created.post.id).await.unwrap();
        assert_eq!(fetched.post, created.post);
        assert_eq!(fetched.author.unwrap().username, "admin");

        let all = fx.service.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].author.as_ref().unwrap().id, principal.user_id);
    }

    #[tokio::test]
    async fn test_create_with_upload_uses_stored_name() {
        let fx = fixture();
        let principal = admin(&fx.users).await;

        let created = fx
            .service
            .create(&principal, phishing_fields(), Some(upload()))
            .await
            .unwrap();

        assert_eq!(created.post.image, "stored-1.png");
    }

    #[tokio::test]
    async fn test_invalid_post_stores_no_image() {
        let fx = fixture();
        let principal = admin(&fx.users).await;
        let fields = PostFields {
            category: Some("Gossip".to_string()),
            ..phishing_fields()
        };

        let result = fx.service.create(&principal, fields, Some(upload())).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(fx.images.saved(), 0);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_mutate() {
        let fx = fixture();
        let reader = Principal {
            user_id: Uuid::new_v4(),
            username: "reader".to_string(),
            role: Role::Reader,
        };

        let create = fx.service.create(&reader, phishing_fields(), None).await;
        assert!(matches!(create, Err(DomainError::Forbidden)));

        let delete = fx.service.delete(&reader, Uuid::new_v4()).await;
        assert!(matches!(delete, Err(DomainError::Forbidden)));
    }

    #[tokio::test]
    async fn test_update_post() {
        let fx = fixture();
        let principal = admin(&fx.users).await;
        let created = fx.service.create(&principal, phishing_fields(), None).await.unwrap();

        let updated = fx
            .service
            .update(
                &principal,
                created.post.id,
                PostFields {
                    title: Some("Phishing, Part 2".to_string()),
                    ..Default::default()
                },
                Some(upload()),
            )
            .await
            .unwrap();

        assert_eq!(updated.post.slug, "phishing-part-2");
        assert_eq!(updated.post.content, created.post.content);
        assert_eq!(updated.post.image, "stored-1.png");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_post() {
        let fx = fixture();
        let principal = admin(&fx.users).await;
        let id = Uuid::new_v4();

        let update = fx
            .service
            .update(&principal, id, PostFields::default(), None)
            .await;
        assert!(matches!(update, Err(DomainError::NotFound { entity_type: "Post", .. })));

        let delete = fx.service.delete(&principal, id).await;
        assert!(matches!(delete, Err(DomainError::NotFound { entity_type: "Post", .. })));
    }

    #[tokio::test]
    async fn test_delete_post() {
        let fx = fixture();
        let principal = admin(&fx.users).await;
        let created = fx.service.create(&principal, phishing_fields(), None).await.unwrap();

        fx.service.delete(&principal, created.post.id).await.unwrap();

        assert!(matches!(
            fx.service.get(created.post.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_insert_removes_stored_image() {
        let users = Arc::new(FakeUserRepository::default());
        let images = Arc::new(FakeImageStore::default());
        let service = PostService::new(
            Arc::new(FailingPostRepository::default()),
            users.clone(),
            images.clone(),
        );
        let principal = admin(&users).await;

        let result = service.create(&principal, phishing_fields(), Some(upload())).await;

        assert!(matches!(result, Err(DomainError::Internal(_))));
        assert_eq!(images.saved(), 1);
        assert_eq!(images.removed(), vec!["stored-1.png".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_update_removes_stored_image() {
        let users = Arc::new(FakeUserRepository::default());
        let images = Arc::new(FakeImageStore::default());
        let posts = Arc::new(FailingPostRepository::default());
        let service = PostService::new(posts.clone(), users.clone(), images.clone());
        let principal = admin(&users).await;
        let existing = Post::create(principal.user_id, phishing_fields(), None).unwrap();
        posts.seed(existing.clone());

        let result = service
            .update(&principal, existing.id, PostFields::default(), Some(upload()))
            .await;

        assert!(matches!(result, Err(DomainError::Internal(_))));
        assert_eq!(images.removed(), vec!["stored-1.png".to_string()]);
    }

    #[tokio::test]
    async fn test_successful_write_keeps_stored_image() {
        let fx = fixture();
        let principal = admin(&fx.users).await;

        fx.service
            .create(&principal, phishing_fields(), Some(upload()))
            .await
            .unwrap();

        assert!(fx.images.removed().is_empty());
    }
}
