//! Domain entities - the core business objects.

mod post;
mod slug;
mod user;

pub use post::{
    AuthorSummary, Category, DEFAULT_POST_IMAGE, Post, PostFields, PostWithAuthor,
    TITLE_MAX_CHARS,
};
pub use slug::slugify;
pub use user::{NewUser, Principal, Role, User, UserCredentials};
