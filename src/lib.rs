//! Rondas core
//!
//! Checklist run lifecycle engine for facility audit rounds: employees
//! open a run against a section, record pass/fail/na entries (with photo
//! evidence and notes where the item demands them), submit, and staff
//! review. Admins manage the checklist structure and user roles.
//!
//! This crate is the core behind an API host: operations consume an
//! already-authenticated [`domain::Principal`] and return domain results
//! or a typed [`operations::CoreError`]. HTTP wiring, credentials, and the
//! frontend live elsewhere.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod operations;
pub mod shared;

pub use domain::{Principal, Role};
pub use operations::{CoreError, CoreResult, ErrorKind};

use crate::config::AppConfig;
use crate::infrastructure::database::Database;
use crate::infrastructure::photos::{LocalPhotoStore, PhotoStore, PUBLIC_PHOTO_PREFIX};
use crate::operations::{Dashboard, RunLifecycle, StructureAdmin, UserAdmin};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// The main context for all core operations.
pub struct Core {
    config: AppConfig,
    db: Database,
    photos: Arc<dyn PhotoStore>,
}

impl Core {
    /// Initialize with the platform default data directory.
    pub async fn new() -> anyhow::Result<Self> {
        let data_dir = config::default_data_dir()?;
        Self::new_with_config(data_dir).await
    }

    /// Initialize against a specific data directory.
    pub async fn new_with_config(data_dir: PathBuf) -> anyhow::Result<Self> {
        info!("initializing rondas core at {:?}", data_dir);

        // 1. Load or create app config
        let config = AppConfig::load_or_create(&data_dir)?;
        config.ensure_directories()?;

        // 2. Open the database and bring the schema up to date
        let db = Database::create(&config.db_path()).await?;
        db.migrate().await?;

        // 3. Wire the photo store
        let photos: Arc<dyn PhotoStore> = Arc::new(LocalPhotoStore::new(
            config.uploads_dir(),
            PUBLIC_PHOTO_PREFIX,
        ));

        info!("core ready");
        Ok(Self { config, db, photos })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The run lifecycle engine.
    pub fn runs(&self) -> RunLifecycle {
        RunLifecycle::new(self.db.conn().clone(), self.photos.clone())
    }

    /// Checklist structure administration.
    pub fn structure(&self) -> StructureAdmin {
        StructureAdmin::new(self.db.conn().clone())
    }

    /// User administration.
    pub fn users(&self) -> UserAdmin {
        UserAdmin::new(self.db.conn().clone())
    }

    /// Supervisor dashboard aggregation.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.db.conn().clone())
    }
}
