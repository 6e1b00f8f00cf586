//! Run creation with same-day reuse

use super::{RunDto, RunLifecycle};
use crate::domain::{Principal, RunStatus};
use crate::infrastructure::database::entities::{run, section};
use crate::operations::{CoreError, CoreResult};
use crate::shared::utc_day_bounds;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct CreatedRun {
    pub run: RunDto,
    pub reused: bool,
}

impl RunLifecycle {
    /// Open a run for the acting employee, or hand back today's still-open
    /// run for the same section. Reuse keeps client retries and
    /// back-navigation from spawning duplicate open rounds; once the open
    /// run is submitted, the next call starts a fresh one.
    pub async fn create_or_reuse(
        &self,
        principal: &Principal,
        section_id: i32,
    ) -> CoreResult<CreatedRun> {
        if section::Entity::find_by_id(section_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(CoreError::invalid_input("invalid section_id"));
        }

        let now = Utc::now();
        let (day_start, day_end) = utc_day_bounds(now);

        let existing = run::Entity::find()
            .filter(run::Column::EmployeeId.eq(principal.id))
            .filter(run::Column::SectionId.eq(section_id))
            .filter(run::Column::Status.eq(RunStatus::InProgress.as_ref()))
            .filter(run::Column::StartedAt.gte(day_start))
            .filter(run::Column::StartedAt.lt(day_end))
            .order_by_desc(run::Column::StartedAt)
            .one(&self.db)
            .await?;

        if let Some(model) = existing {
            debug!(run_id = model.id, section_id, "reusing open run");
            return Ok(CreatedRun {
                run: model.try_into()?,
                reused: true,
            });
        }

        let inserted = run::ActiveModel {
            employee_id: Set(principal.id),
            section_id: Set(section_id),
            status: Set(RunStatus::InProgress.as_ref().to_owned()),
            started_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!(run_id = inserted.id, section_id, "opened new run");
        Ok(CreatedRun {
            run: inserted.try_into()?,
            reused: false,
        })
    }
}
