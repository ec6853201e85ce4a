//! Post handlers. Reads are public; writes go through [`AdminIdentity`].

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures::StreamExt;
use uuid::Uuid;

use blog_core::domain::{PostFields, PostWithAuthor};
use blog_core::ports::ImageUpload;
use blog_shared::MessageResponse;
use blog_shared::dto::{AuthorResponse, PostResponse};

use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_response(item: PostWithAuthor) -> PostResponse {
    let PostWithAuthor { post, author } = item;
    PostResponse {
        id: post.id.to_string(),
        title: post.title,
        slug: post.slug,
        content: post.content,
        category: post.category.to_string(),
        image: post.image,
        author: author.map(|a| AuthorResponse {
            id: a.id.to_string(),
            username: a.username,
        }),
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

/// Malformed ids cannot name an existing post.
fn parse_post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Post not found".to_string()))
}

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    let body: Vec<PostResponse> = posts.into_iter().map(post_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/categories
pub async fn list_categories(state: web::Data<AppState>) -> HttpResponse {
    let names: Vec<&str> = state.posts.categories().iter().map(|c| c.as_str()).collect();
    HttpResponse::Ok().json(names)
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let post = state.posts.get(id).await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// POST /api/posts - multipart: title, content, category, image?
pub async fn create_post(
    state: web::Data<AppState>,
    AdminIdentity(identity): AdminIdentity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = PostForm::read(payload, state.max_upload_bytes).await?;

    let post = state
        .posts
        .create(&identity.principal(), form.fields, form.image)
        .await?;

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// PUT /api/posts/{id} - multipart, any subset of fields
pub async fn update_post(
    state: web::Data<AppState>,
    AdminIdentity(identity): AdminIdentity,
    path: web::Path<String>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let form = PostForm::read(payload, state.max_upload_bytes).await?;

    let post = state
        .posts
        .update(&identity.principal(), id, form.fields, form.image)
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    AdminIdentity(identity): AdminIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    state.posts.delete(&identity.principal(), id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

/// Post fields and optional image read from a multipart body.
struct PostForm {
    fields: PostFields,
    image: Option<ImageUpload>,
}

impl PostForm {
    /// Text fields are capped at the same limit as the image.
    async fn read(mut payload: Multipart, max_bytes: usize) -> AppResult<Self> {
        let mut form = PostForm {
            fields: PostFields::default(),
            image: None,
        };

        while let Some(field) = payload.next().await {
            let field = field.map_err(|e| AppError::BadRequest(e.to_string()))?;
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match name.as_str() {
                "title" => form.fields.title = Some(read_text(field, max_bytes).await?),
                "content" => form.fields.content = Some(read_text(field, max_bytes).await?),
                "category" => form.fields.category = Some(read_text(field, max_bytes).await?),
                "image" => {
                    let file_name = field
                        .content_disposition()
                        .and_then(|cd| cd.get_filename())
                        .map(str::to_string);
                    let content_type = field.content_type().map(|m| m.essence_str().to_string());
                    let bytes = read_bytes(field, max_bytes).await?;

                    // An empty file input means "no upload".
                    if !bytes.is_empty() {
                        form.image = Some(ImageUpload {
                            file_name,
                            content_type,
                            bytes,
                        });
                    }
                }
                other => {
                    tracing::debug!(field = %other, "Ignoring unknown multipart field");
                    drain(field).await?;
                }
            }
        }

        Ok(form)
    }
}

async fn read_bytes(mut field: Field, max_bytes: usize) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
        if bytes.len() + chunk.len() > max_bytes {
            return Err(AppError::Validation(format!(
                "Upload exceeds the {max_bytes} byte limit"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_text(field: Field, max_bytes: usize) -> AppResult<String> {
    let bytes = read_bytes(field, max_bytes).await?;
    String::from_utf8(bytes).map_err(|_| AppError::BadRequest("Form fields must be UTF-8".to_string()))
}

async fn drain(mut field: Field) -> AppResult<()> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
    }
    Ok(())
}
