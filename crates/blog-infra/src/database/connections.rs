#[cfg(feature = "postgres")]
use std::sync::Arc;
#[cfg(feature = "postgres")]
use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the blog database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Connection pool with an explicit lifecycle: created once in `main` via
/// [`DatabaseConnections::init`] and released with
/// [`DatabaseConnections::close`] on shutdown.
///
/// Repositories hold clones of `main`.
#[cfg(feature = "postgres")]
pub struct DatabaseConnections {
    pub main: Arc<DbConn>,
}

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Open the connection pool.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false)
            .to_owned();

        let main = Arc::new(Database::connect(opts).await?);
        tracing::info!(
            "Database connected (pool: {}..{})",
            config.min_connections,
            config.max_connections
        );

        Ok(Self { main })
    }

    /// Close the pool. Repositories sharing it must be dropped first;
    /// otherwise the pool closes when the last of them goes away.
    pub async fn close(self) -> Result<(), DbErr> {
        match Arc::try_unwrap(self.main) {
            Ok(conn) => {
                conn.close().await?;
                tracing::info!("Database connection closed");
            }
            Err(shared) => {
                tracing::warn!(
                    holders = Arc::strong_count(&shared),
                    "Database pool still in use; it closes when the last holder drops"
                );
            }
        }
        Ok(())
    }
}
