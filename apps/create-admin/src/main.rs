//! Seed the administrator account.
//!
//! Reads `DATABASE_URL`, `ADMIN_USERNAME` (default `admin`) and
//! `ADMIN_PASSWORD`. Pending migrations are applied first. Running it again
//! once the account exists is a no-op.

use std::sync::Arc;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};

use blog_core::domain::Role;
use blog_core::services::AccountService;
use blog_infra::database::PostgresUserRepository;
use blog_infra::{Argon2PasswordService, DatabaseConfig, DatabaseConnections};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;

    let db = DatabaseConnections::init(&DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 1,
    })
    .await
    .context("failed to connect to database")?;

    Migrator::up(db.main.as_ref(), None)
        .await
        .context("failed to apply migrations")?;

    let accounts = AccountService::new(
        Arc::new(PostgresUserRepository::new(db.main.clone())),
        Arc::new(Argon2PasswordService::new()),
    );

    if let Some(existing) = accounts.find_by_username(&username).await? {
        tracing::info!(user_id = %existing.id, role = %existing.role, "Admin user already exists");
    } else {
        let admin = accounts
            .create_user(&username, &password, Role::Admin)
            .await
            .context("failed to create admin user")?;
        tracing::info!(user_id = %admin.id, username = %admin.username, "Admin user created");
    }

    // Release the repository's share of the pool before closing it.
    drop(accounts);
    db.close().await?;
    Ok(())
}
