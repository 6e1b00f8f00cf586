//! Database infrastructure using SeaORM

use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod entities;
pub mod migration;

/// Wrapper around the SQLite-backed checklist store.
pub struct Database {
    conn: DatabaseConnection,
}

impl Database {
    /// Create (or open) the database at the given path.
    pub async fn create(path: &Path) -> Result<Self, DbErr> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DbErr::Custom(format!("failed to create database directory: {e}")))?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", path.display());
        let conn = SeaDatabase::connect(Self::options(db_url)).await?;

        info!("created database at {:?}", path);
        Ok(Self { conn })
    }

    /// Open an existing database; fails if the file is missing.
    pub async fn open(path: &Path) -> Result<Self, DbErr> {
        if !path.exists() {
            return Err(DbErr::Custom(format!(
                "database does not exist: {}",
                path.display()
            )));
        }

        let db_url = format!("sqlite://{}", path.display());
        let conn = SeaDatabase::connect(Self::options(db_url)).await?;

        info!("opened database at {:?}", path);
        Ok(Self { conn })
    }

    fn options(db_url: String) -> ConnectOptions {
        let mut opt = ConnectOptions::new(db_url);
        opt.max_connections(5)
            .connect_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(8))
            .sqlx_logging(false); // tracing carries the log output
        opt
    }

    /// Bring the schema up to date.
    pub async fn migrate(&self) -> Result<(), DbErr> {
        migration::Migrator::up(&self.conn, None).await?;
        info!("database migrations completed");
        Ok(())
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }
}
