use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::slugify;
use crate::error::DomainError;

/// Image file name used when a post is created without an upload.
pub const DEFAULT_POST_IMAGE: &str = "default-post.jpg";

/// Maximum title length, counted in characters after trimming.
pub const TITLE_MAX_CHARS: usize = 200;

/// The fixed set of blog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Phishing,
    Ransomware,
    Malware,
    #[serde(rename = "Social Engineering")]
    SocialEngineering,
    #[serde(rename = "Data Breaches")]
    DataBreaches,
    #[serde(rename = "Identity Theft")]
    IdentityTheft,
    #[serde(rename = "Password Security")]
    PasswordSecurity,
    #[serde(rename = "Network Security")]
    NetworkSecurity,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Phishing,
        Category::Ransomware,
        Category::Malware,
        Category::SocialEngineering,
        Category::DataBreaches,
        Category::IdentityTheft,
        Category::PasswordSecurity,
        Category::NetworkSecurity,
    ];

    /// Display name, also the wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Phishing => "Phishing",
            Category::Ransomware => "Ransomware",
            Category::Malware => "Malware",
            Category::SocialEngineering => "Social Engineering",
            Category::DataBreaches => "Data Breaches",
            Category::IdentityTheft => "Identity Theft",
            Category::PasswordSecurity => "Password Security",
            Category::NetworkSecurity => "Network Security",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("`{s}` is not a valid category"))
    }
}

/// Post entity - a blog article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category: Category,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw, unvalidated post fields as submitted by a client.
///
/// All fields are required on create; on update only the present ones apply.
#[derive(Debug, Clone, Default)]
pub struct PostFields {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl Post {
    /// Validate `fields` and build a new post. `image` defaults to
    /// [`DEFAULT_POST_IMAGE`].
    pub fn create(
        author_id: Uuid,
        fields: PostFields,
        image: Option<String>,
    ) -> Result<Self, DomainError> {
        let mut errors = Vec::new();

        let title = required(fields.title, "Title", &mut errors)
            .and_then(|t| checked_title(t, &mut errors));
        let content = required(fields.content, "Content", &mut errors);
        let category = required(fields.category, "Category", &mut errors)
            .and_then(|c| parse_category(&c, &mut errors));

        match (title, content, category) {
            (Some(title), Some(content), Some(category)) if errors.is_empty() => {
                let now = Utc::now();
                Ok(Self {
                    id: Uuid::new_v4(),
                    author_id,
                    slug: slugify(&title),
                    title,
                    content,
                    category,
                    image: image.unwrap_or_else(|| DEFAULT_POST_IMAGE.to_string()),
                    created_at: now,
                    updated_at: now,
                })
            }
            _ => Err(validation_error(errors)),
        }
    }

    /// Apply a partial update. Nothing is changed unless every present field
    /// is valid. The slug is re-derived from the resulting title.
    pub fn apply(&mut self, fields: PostFields) -> Result<(), DomainError> {
        let mut errors = Vec::new();

        let title = fields.title.map(|t| {
            required(Some(t), "Title", &mut errors).and_then(|t| checked_title(t, &mut errors))
        });
        let content = fields.content.map(|c| required(Some(c), "Content", &mut errors));
        let category = fields.category.map(|c| {
            required(Some(c), "Category", &mut errors).and_then(|c| parse_category(&c, &mut errors))
        });

        if !errors.is_empty() {
            return Err(validation_error(errors));
        }

        if let Some(Some(title)) = title {
            self.title = title;
        }
        if let Some(Some(content)) = content {
            self.content = content;
        }
        if let Some(Some(category)) = category {
            self.category = category;
        }
        self.slug = slugify(&self.title);
        self.updated_at = Utc::now();

        Ok(())
    }
}

fn required(value: Option<String>, field: &str, errors: &mut Vec<String>) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.push(format!("{field} is required"));
            None
        }
    }
}

fn checked_title(title: String, errors: &mut Vec<String>) -> Option<String> {
    if title.chars().count() > TITLE_MAX_CHARS {
        errors.push(format!("Title cannot be more than {TITLE_MAX_CHARS} characters"));
        return None;
    }
    Some(title)
}

fn parse_category(value: &str, errors: &mut Vec<String>) -> Option<Category> {
    match value.parse() {
        Ok(category) => Some(category),
        Err(msg) => {
            errors.push(msg);
            None
        }
    }
}

fn validation_error(errors: Vec<String>) -> DomainError {
    DomainError::Validation(format!("Post validation failed: {}", errors.join(", ")))
}

/// Minimal author projection attached to posts on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
}

/// A post with its author resolved. `author` is `None` when the account no
/// longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: Option<AuthorSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str, content: &str, category: &str) -> PostFields {
        PostFields {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            category: Some(category.to_string()),
        }
    }

    #[test]
    fn test_create_post_derives_slug_and_default_image() {
        let post = Post::create(
            Uuid::new_v4(),
            fields("  New Phishing Scam!  ", " Beware. ", "Phishing"),
            None,
        )
        .unwrap();

        assert_eq!(post.title, "New Phishing Scam!");
        assert_eq!(post.content, "Beware.");
        assert_eq!(post.slug, "new-phishing-scam");
        assert_eq!(post.category, Category::Phishing);
        assert_eq!(post.image, DEFAULT_POST_IMAGE);
    }

    #[test]
    fn test_create_post_rejects_unknown_category() {
        let result = Post::create(Uuid::new_v4(), fields("Title", "Body", "Gossip"), None);

        match result {
            Err(DomainError::Validation(msg)) => {
                assert!(msg.contains("`Gossip` is not a valid category"))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_create_post_reports_all_missing_fields() {
        let result = Post::create(Uuid::new_v4(), PostFields::default(), None);

        let Err(DomainError::Validation(msg)) = result else {
            panic!("expected validation error");
        };
        assert!(msg.contains("Title is required"));
        assert!(msg.contains("Content is required"));
        assert!(msg.contains("Category is required"));
    }

    #[test]
    fn test_title_length_limit() {
        let ok = "a".repeat(TITLE_MAX_CHARS);
        let too_long = "a".repeat(TITLE_MAX_CHARS + 1);

        assert!(Post::create(Uuid::new_v4(), fields(&ok, "Body", "Malware"), None).is_ok());
        assert!(Post::create(Uuid::new_v4(), fields(&too_long, "Body", "Malware"), None).is_err());
    }

    #[test]
    fn test_apply_partial_update_recomputes_slug() {
        let mut post =
            Post::create(Uuid::new_v4(), fields("Old title", "Body", "Malware"), None).unwrap();

        post.apply(PostFields {
            title: Some("Brand New Title".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(post.slug, "brand-new-title");
        assert_eq!(post.content, "Body");
        assert_eq!(post.category, Category::Malware);
        assert_eq!(post.image, DEFAULT_POST_IMAGE);
    }

    #[test]
    fn test_apply_invalid_update_leaves_post_untouched() {
        let mut post =
            Post::create(Uuid::new_v4(), fields("Old title", "Body", "Malware"), None).unwrap();
        let before = post.clone();

        let result = post.apply(PostFields {
            title: Some("Fine".to_string()),
            category: Some("Unknown".to_string()),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(post, before);
    }

    #[test]
    fn test_category_round_trips_display_name() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert_eq!(
            serde_json::to_string(&Category::SocialEngineering).unwrap(),
            "\"Social Engineering\""
        );
    }
}
