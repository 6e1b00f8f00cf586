//! Read-only aggregation for the supervisor dashboard
//!
//! Depends on the run engine's data but has no behavior of its own:
//! today's totals by status, plus per-section counts and the most recent
//! run of the day.

use crate::domain::{Action, Principal, RunStatus};
use crate::infrastructure::database::entities::{run, section, user};
use crate::operations::runs::run_status;
use crate::operations::{require, CoreResult};
use crate::shared::utc_day_bounds;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusCounts {
    pub in_progress: i64,
    pub submitted: i64,
    pub reviewed: i64,
}

impl StatusCounts {
    fn bump(&mut self, status: RunStatus) {
        match status {
            RunStatus::InProgress => self.in_progress += 1,
            RunStatus::Submitted => self.submitted += 1,
            RunStatus::Reviewed => self.reviewed += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LastRun {
    pub id: i32,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub employee_name: String,
    pub employee_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionSummary {
    pub section_id: i32,
    pub section_name: String,
    pub is_active: bool,
    pub counts: StatusCounts,
    pub last_run: Option<LastRun>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub totals: StatusCounts,
    pub sections: Vec<SectionSummary>,
}

pub struct Dashboard {
    db: DatabaseConnection,
}

impl Dashboard {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn summary(&self, principal: &Principal) -> CoreResult<DashboardSummary> {
        require(principal, Action::ViewDashboard)?;

        let (day_start, day_end) = utc_day_bounds(Utc::now());
        let today = run::Entity::find()
            .filter(run::Column::StartedAt.gte(day_start))
            .filter(run::Column::StartedAt.lt(day_end))
            .order_by_asc(run::Column::StartedAt)
            .all(&self.db)
            .await?;

        let mut totals = StatusCounts::default();
        let mut by_section: HashMap<i32, StatusCounts> = HashMap::new();
        let mut last_by_section: HashMap<i32, &run::Model> = HashMap::new();
        for model in &today {
            let status = run_status(model)?;
            totals.bump(status);
            by_section.entry(model.section_id).or_default().bump(status);
            // Runs arrive started_at ascending, so the last write wins.
            last_by_section.insert(model.section_id, model);
        }

        let employee_ids: Vec<i32> = {
            let mut ids: Vec<i32> = last_by_section.values().map(|r| r.employee_id).collect();
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

        let sections = section::Entity::find()
            .order_by_asc(section::Column::Name)
            .all(&self.db)
            .await?;

        let mut summaries = Vec::with_capacity(sections.len());
        for section in sections {
            let last_run = match last_by_section.get(&section.id) {
                Some(&model) => {
                    let (employee_name, employee_email) = employees
                        .get(&model.employee_id)
                        .cloned()
                        .unwrap_or_default();
                    Some(LastRun {
                        id: model.id,
                        status: run_status(model)?,
                        started_at: model.started_at,
                        employee_name,
                        employee_email,
                    })
                }
                None => None,
            };
            summaries.push(SectionSummary {
                section_id: section.id,
                section_name: section.name,
                is_active: section.is_active,
                counts: by_section.get(&section.id).copied().unwrap_or_default(),
                last_run,
            });
        }

        Ok(DashboardSummary {
            totals,
            sections: summaries,
        })
    }
}
