//! Run deletion

use super::RunLifecycle;
use crate::domain::{Action, Principal};
use crate::infrastructure::database::entities::{entry, run};
use crate::operations::{require, CoreResult};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use tracing::info;

impl RunLifecycle {
    /// Remove a run and everything recorded against it. The entry sweep
    /// and the run row go in one transaction; a failure part-way leaves
    /// both fully intact.
    pub async fn delete(&self, principal: &Principal, run_id: i32) -> CoreResult<()> {
        require(principal, Action::DeleteRun)?;
        self.fetch_run(run_id).await?;

        let txn = self.db.begin().await?;
        entry::Entity::delete_many()
            .filter(entry::Column::RunId.eq(run_id))
            .exec(&txn)
            .await?;
        run::Entity::delete_by_id(run_id).exec(&txn).await?;
        txn.commit().await?;

        info!(run_id, "run deleted");
        Ok(())
    }
}
