//! Submit and review transitions

use super::{run_status, RunDto, RunLifecycle};
use crate::domain::{Action, Principal, RunStatus};
use crate::infrastructure::database::entities::{entry, run};
use crate::operations::{require, CoreError, CoreResult};
use crate::shared::normalized_note;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use tracing::info;

impl RunLifecycle {
    /// Hand the run in. Requires at least one recorded entry; full item
    /// coverage is a client-side nudge, not enforced here. After this the
    /// run is immutable to entry changes for everyone.
    pub async fn submit(&self, principal: &Principal, run_id: i32) -> CoreResult<RunDto> {
        let run = self.fetch_run(run_id).await?;
        require(principal, Action::EditRun { owner: run.employee_id })?;

        if !run_status(&run)?.editable() {
            return Err(CoreError::invalid_state("run already submitted/reviewed"));
        }

        let entries = entry::Entity::find()
            .filter(entry::Column::RunId.eq(run_id))
            .count(&self.db)
            .await?;
        if entries == 0 {
            return Err(CoreError::validation("cannot submit an empty run"));
        }

        let mut active: run::ActiveModel = run.into();
        active.status = Set(RunStatus::Submitted.as_ref().to_owned());
        active.submitted_at = Set(Some(Utc::now()));
        let updated = active.update(&self.db).await?;

        info!(run_id, "run submitted");
        updated.try_into()
    }

    /// Record a supervisor verdict on a handed-in run. Reviewing an
    /// already-reviewed run is allowed and replaces the previous verdict.
    pub async fn review(
        &self,
        principal: &Principal,
        run_id: i32,
        review_note: Option<&str>,
    ) -> CoreResult<RunDto> {
        let run = self.fetch_run(run_id).await?;
        require(principal, Action::ReviewRun)?;

        if !run_status(&run)?.reviewable() {
            return Err(CoreError::invalid_state("must be submitted first"));
        }

        let mut active: run::ActiveModel = run.into();
        active.status = Set(RunStatus::Reviewed.as_ref().to_owned());
        active.reviewed_at = Set(Some(Utc::now()));
        active.reviewed_by = Set(Some(principal.id));
        active.review_note = Set(normalized_note(review_note));
        let updated = active.update(&self.db).await?;

        info!(run_id, reviewer = principal.id, "run reviewed");
        updated.try_into()
    }
}
