//! The run lifecycle engine
//!
//! Owns run creation/reuse, entry upsert, the submit and review
//! transitions, deletion, and the read surface around them. The engine is
//! stateless; the store is the only synchronization point, and every
//! multi-statement effect runs inside a transaction.

mod create;
mod delete;
mod entries;
mod queries;
mod transitions;

pub use create::CreatedRun;
pub use entries::{EntryDto, EntryUpsert};
pub use queries::{AdminRunRow, EntryWithItem, MyRunSummary, RunDetail, RunFilters};

use crate::domain::{EntryResult, RunStatus};
use crate::infrastructure::database::entities::{entry, run};
use crate::infrastructure::photos::PhotoStore;
use crate::operations::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use serde::Serialize;
use std::sync::Arc;

/// A run as surfaced to callers.
#[derive(Debug, Clone, Serialize)]
pub struct RunDto {
    pub id: i32,
    pub employee_id: i32,
    pub section_id: i32,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<i32>,
    pub review_note: Option<String>,
}

impl TryFrom<run::Model> for RunDto {
    type Error = CoreError;

    fn try_from(model: run::Model) -> Result<Self, CoreError> {
        let status = run_status(&model)?;
        Ok(Self {
            id: model.id,
            employee_id: model.employee_id,
            section_id: model.section_id,
            status,
            started_at: model.started_at,
            submitted_at: model.submitted_at,
            reviewed_at: model.reviewed_at,
            reviewed_by: model.reviewed_by,
            review_note: model.review_note,
        })
    }
}

/// Parse the stored status string; anything unrecognized is data corruption
/// and surfaces as an internal error.
pub(crate) fn run_status(model: &run::Model) -> CoreResult<RunStatus> {
    model.status.parse().map_err(|_| {
        CoreError::Database(DbErr::Custom(format!(
            "run {} has unrecognized status `{}`",
            model.id, model.status
        )))
    })
}

pub(crate) fn entry_result(model: &entry::Model) -> CoreResult<EntryResult> {
    model.result.parse().map_err(|_| {
        CoreError::Database(DbErr::Custom(format!(
            "entry {} has unrecognized result `{}`",
            model.id, model.result
        )))
    })
}

/// The run lifecycle engine.
pub struct RunLifecycle {
    db: DatabaseConnection,
    photos: Arc<dyn PhotoStore>,
}

impl RunLifecycle {
    pub fn new(db: DatabaseConnection, photos: Arc<dyn PhotoStore>) -> Self {
        Self { db, photos }
    }

    /// Fetch a run row or the canonical not-found failure.
    async fn fetch_run(&self, run_id: i32) -> CoreResult<run::Model> {
        run::Entity::find_by_id(run_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::not_found("run"))
    }
}
