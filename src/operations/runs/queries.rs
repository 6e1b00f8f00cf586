//! Read surface over runs and entries

use super::{entry_result, run_status, RunDto, RunLifecycle};
use crate::domain::{Action, EntryResult, Principal, RunStatus};
use crate::infrastructure::database::entities::{entry, item, run, section, user};
use crate::operations::{require, CoreError, CoreResult};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;
use std::collections::HashMap;

/// Bounded page sizes; listings are newest-first with a hard cap rather
/// than cursor-paginated.
const MY_RUNS_CAP: u64 = 200;
const ADMIN_RUNS_CAP: u64 = 500;

/// One of the caller's runs, with progress counts for the section's
/// currently-active checklist.
#[derive(Debug, Clone, Serialize)]
pub struct MyRunSummary {
    pub id: i32,
    pub section_id: i32,
    pub section_name: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub items_total: i64,
    pub entries_done: i64,
}

/// A run joined with its section and employee, plus its entries in
/// checklist order.
#[derive(Debug, Clone, Serialize)]
pub struct RunDetail {
    pub run: RunDto,
    pub section_name: String,
    pub employee_name: String,
    pub employee_email: String,
    pub entries: Vec<EntryWithItem>,
}

/// An entry joined with the item it answers.
#[derive(Debug, Clone, Serialize)]
pub struct EntryWithItem {
    pub id: i32,
    pub run_id: i32,
    pub item_id: i32,
    pub result: EntryResult,
    pub note: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub instructions: Option<String>,
    pub requires_photo: bool,
    pub requires_note_on_fail: bool,
    pub sort_order: i32,
}

/// Filters for the staff-wide run listing. All fields are optional and
/// combine conjunctively.
#[derive(Debug, Clone, Default)]
pub struct RunFilters {
    pub status: Option<RunStatus>,
    pub section_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

/// A run row in the staff listing, with display names resolved.
#[derive(Debug, Clone, Serialize)]
pub struct AdminRunRow {
    pub run: RunDto,
    pub employee_name: String,
    pub employee_email: String,
    pub section_name: String,
}

impl RunLifecycle {
    /// Latest run for the caller in one section, regardless of status.
    pub async fn run_status(
        &self,
        principal: &Principal,
        section_id: i32,
    ) -> CoreResult<Option<RunDto>> {
        let found = run::Entity::find()
            .filter(run::Column::EmployeeId.eq(principal.id))
            .filter(run::Column::SectionId.eq(section_id))
            .order_by_desc(run::Column::StartedAt)
            .one(&self.db)
            .await?;
        found.map(RunDto::try_from).transpose()
    }

    /// The caller's runs, newest first, with progress counts. Counts only
    /// consider active items, so deactivated questions neither inflate the
    /// total nor count as done.
    pub async fn my_runs(
        &self,
        principal: &Principal,
        status: Option<RunStatus>,
    ) -> CoreResult<Vec<MyRunSummary>> {
        let mut query = run::Entity::find().filter(run::Column::EmployeeId.eq(principal.id));
        if let Some(status) = status {
            query = query.filter(run::Column::Status.eq(status.as_ref()));
        }
        let runs = query
            .order_by_desc(run::Column::StartedAt)
            .limit(MY_RUNS_CAP)
            .all(&self.db)
            .await?;

        if runs.is_empty() {
            return Ok(Vec::new());
        }

        let section_ids: Vec<i32> = {
            let mut ids: Vec<i32> = runs.iter().map(|r| r.section_id).collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };
        let section_names: HashMap<i32, String> = section::Entity::find()
            .filter(section::Column::Id.is_in(section_ids.clone()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let items_total: HashMap<i32, i64> = item::Entity::find()
            .select_only()
            .column(item::Column::SectionId)
            .column_as(item::Column::Id.count(), "total")
            .filter(item::Column::SectionId.is_in(section_ids))
            .filter(item::Column::IsActive.eq(true))
            .group_by(item::Column::SectionId)
            .into_tuple::<(i32, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        let run_ids: Vec<i32> = runs.iter().map(|r| r.id).collect();
        let entries_done: HashMap<i32, i64> = entry::Entity::find()
            .select_only()
            .column(entry::Column::RunId)
            .column_as(entry::Column::Id.count(), "done")
            .join(JoinType::InnerJoin, entry::Relation::Item.def())
            .filter(entry::Column::RunId.is_in(run_ids))
            .filter(item::Column::IsActive.eq(true))
            .group_by(entry::Column::RunId)
            .into_tuple::<(i32, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        runs.into_iter()
            .map(|model| {
                let status = run_status(&model)?;
                Ok(MyRunSummary {
                    id: model.id,
                    section_id: model.section_id,
                    section_name: section_names
                        .get(&model.section_id)
                        .cloned()
                        .unwrap_or_default(),
                    status,
                    started_at: model.started_at,
                    submitted_at: model.submitted_at,
                    reviewed_at: model.reviewed_at,
                    items_total: items_total.get(&model.section_id).copied().unwrap_or(0),
                    entries_done: entries_done.get(&model.id).copied().unwrap_or(0),
                })
            })
            .collect()
    }

    /// A run with its entries in checklist order: item `sort_order` first,
    /// then entry creation time, so the client replays items in display
    /// order regardless of the order they were filled in.
    pub async fn get_run(&self, principal: &Principal, run_id: i32) -> CoreResult<RunDetail> {
        let run = self.fetch_run(run_id).await?;
        require(principal, Action::ViewRun { owner: run.employee_id })?;

        let section = section::Entity::find_by_id(run.section_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                CoreError::Database(DbErr::RecordNotFound("run without section".into()))
            })?;
        let employee = user::Entity::find_by_id(run.employee_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                CoreError::Database(DbErr::RecordNotFound("run without employee".into()))
            })?;

        let rows = entry::Entity::find()
            .filter(entry::Column::RunId.eq(run_id))
            .find_also_related(item::Entity)
            .order_by_asc(item::Column::SortOrder)
            .order_by_asc(entry::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for (entry_model, item_model) in rows {
            let item_model = item_model.ok_or_else(|| {
                CoreError::Database(DbErr::RecordNotFound("entry without item".into()))
            })?;
            let result = entry_result(&entry_model)?;
            entries.push(EntryWithItem {
                id: entry_model.id,
                run_id: entry_model.run_id,
                item_id: entry_model.item_id,
                result,
                note: entry_model.note,
                photo_url: entry_model.photo_url,
                created_at: entry_model.created_at,
                title: item_model.title,
                instructions: item_model.instructions,
                requires_photo: item_model.requires_photo,
                requires_note_on_fail: item_model.requires_note_on_fail,
                sort_order: item_model.sort_order,
            });
        }

        Ok(RunDetail {
            run: run.try_into()?,
            section_name: section.name,
            employee_name: employee.full_name,
            employee_email: employee.email,
            entries,
        })
    }

    /// Staff-wide run listing, newest first, capped.
    pub async fn list_runs(
        &self,
        principal: &Principal,
        filters: RunFilters,
    ) -> CoreResult<Vec<AdminRunRow>> {
        require(principal, Action::ListRuns)?;

        let mut query = run::Entity::find();
        if let Some(status) = filters.status {
            query = query.filter(run::Column::Status.eq(status.as_ref()));
        }
        if let Some(section_id) = filters.section_id {
            query = query.filter(run::Column::SectionId.eq(section_id));
        }
        if let Some(employee_id) = filters.employee_id {
            query = query.filter(run::Column::EmployeeId.eq(employee_id));
        }
        if let Some(from) = filters.date_from {
            query = query.filter(run::Column::StartedAt.gte(from));
        }
        if let Some(to) = filters.date_to {
            query = query.filter(run::Column::StartedAt.lte(to));
        }

        let runs = query
            .order_by_desc(run::Column::StartedAt)
            .limit(ADMIN_RUNS_CAP)
            .all(&self.db)
            .await?;

        let employee_ids: Vec<i32> = {
            let mut ids: Vec<i32> = runs.iter().map(|r| r.employee_id).collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };
        let employees: HashMap<i32, (String, String)> = user::Entity::find()
            .filter(user::Column::Id.is_in(employee_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, (u.full_name, u.email)))
            .collect();

        let section_ids: Vec<i32> = {
            let mut ids: Vec<i32> = runs.iter().map(|r| r.section_id).collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };
        let sections: HashMap<i32, String> = section::Entity::find()
            .filter(section::Column::Id.is_in(section_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        runs.into_iter()
            .map(|model| {
                let (employee_name, employee_email) = employees
                    .get(&model.employee_id)
                    .cloned()
                    .unwrap_or_default();
                let section_name = sections
                    .get(&model.section_id)
                    .cloned()
                    .unwrap_or_default();
                Ok(AdminRunRow {
                    run: model.try_into()?,
                    employee_name,
                    employee_email,
                    section_name,
                })
            })
            .collect()
    }
}
