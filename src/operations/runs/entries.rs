//! Entry upsert with conditional field requirements

use super::{entry_result, run_status, RunLifecycle};
use crate::domain::{Action, EntryResult, PhotoInput, Principal};
use crate::infrastructure::database::entities::{entry, item};
use crate::operations::{require, CoreError, CoreResult};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use tracing::debug;

/// Inputs for a single entry upsert.
#[derive(Debug, Clone)]
pub struct EntryUpsert {
    pub item_id: i32,
    pub result: EntryResult,
    pub note: Option<String>,
    pub photo: PhotoInput,
}

/// An entry as surfaced to callers.
#[derive(Debug, Clone, Serialize)]
pub struct EntryDto {
    pub id: i32,
    pub run_id: i32,
    pub item_id: i32,
    pub result: EntryResult,
    pub note: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<entry::Model> for EntryDto {
    type Error = CoreError;

    fn try_from(model: entry::Model) -> Result<Self, CoreError> {
        let result = entry_result(&model)?;
        Ok(Self {
            id: model.id,
            run_id: model.run_id,
            item_id: model.item_id,
            result,
            note: model.note,
            photo_url: model.photo_url,
            created_at: model.created_at,
        })
    }
}

impl RunLifecycle {
    /// Record or replace the result for one item of an open run.
    ///
    /// Precondition order is part of the contract: missing run, then
    /// authorization, then run state, then item existence, then the photo
    /// and fail-note requirements. Nothing is written until every check
    /// passes; the upload lands in the photo store first and the row
    /// upsert rides on the store's `(run_id, item_id)` conflict clause, so
    /// concurrent writers can never split one entry into two rows.
    pub async fn upsert_entry(
        &self,
        principal: &Principal,
        run_id: i32,
        input: EntryUpsert,
    ) -> CoreResult<EntryDto> {
        let run = self.fetch_run(run_id).await?;
        require(principal, Action::EditRun { owner: run.employee_id })?;

        if !run_status(&run)?.editable() {
            return Err(CoreError::invalid_state("run is not editable"));
        }

        let item = item::Entity::find_by_id(input.item_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::invalid_input("item not found"))?;

        let existing = entry::Entity::find()
            .filter(entry::Column::RunId.eq(run_id))
            .filter(entry::Column::ItemId.eq(input.item_id))
            .one(&self.db)
            .await?;

        if item.requires_photo {
            let on_record = existing
                .as_ref()
                .is_some_and(|e| e.photo_url.is_some());
            if input.photo.is_none() && !on_record {
                return Err(CoreError::validation("item requires photo"));
            }
        }

        if item.requires_note_on_fail && input.result == EntryResult::Fail {
            let note_len = input
                .note
                .as_deref()
                .map(|n| n.trim().chars().count())
                .unwrap_or(0);
            if note_len < 3 {
                return Err(CoreError::validation("fail requires a substantive note"));
            }
        }

        let photo_url = match &input.photo {
            PhotoInput::None => None,
            PhotoInput::Upload {
                bytes,
                content_type,
            } => Some(self.photos.store(bytes, content_type).await?),
            PhotoInput::ExistingUrl(url) => Some(url.clone()),
        };

        let mut on_conflict =
            OnConflict::columns([entry::Column::RunId, entry::Column::ItemId]);
        on_conflict.update_columns([
            entry::Column::Result,
            entry::Column::Note,
            entry::Column::CreatedAt,
        ]);
        if photo_url.is_some() {
            // A fresh photo replaces the stored one; absent that, the
            // stored photo survives the upsert.
            on_conflict.update_column(entry::Column::PhotoUrl);
        }

        entry::Entity::insert(entry::ActiveModel {
            run_id: Set(run_id),
            item_id: Set(input.item_id),
            result: Set(input.result.as_ref().to_owned()),
            note: Set(input.note.clone()),
            photo_url: Set(photo_url),
            created_at: Set(Utc::now()),
            ..Default::default()
        })
        .on_conflict(on_conflict)
        .exec(&self.db)
        .await?;

        debug!(run_id, item_id = input.item_id, "entry upserted");

        let stored = entry::Entity::find()
            .filter(entry::Column::RunId.eq(run_id))
            .filter(entry::Column::ItemId.eq(input.item_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                CoreError::Database(DbErr::RecordNotFound("entry missing after upsert".into()))
            })?;
        stored.try_into()
    }
}
