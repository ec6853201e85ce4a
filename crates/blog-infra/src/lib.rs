//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`:
//! repositories, token signing, password hashing and image storage.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//!
//! The in-memory repositories are always available and back the server when
//! no database is configured.

pub mod auth;
pub mod database;
pub mod storage;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, InMemoryPostRepository, InMemoryUserRepository};
pub use storage::{LocalImageStore, UploadConfig};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;
