//! Checklist structure administration and the employee-facing listings
//!
//! Sections and items are read-many/write-rare: employees read the active
//! structure, only admins change it. Deletions are guarded so run history
//! is never silently destroyed through structural cleanup.

use crate::domain::{Action, Principal};
use crate::infrastructure::database::entities::{entry, item, run, section};
use crate::operations::error::codes;
use crate::operations::{require, CoreError, CoreResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

/// Everything an admin sees on the structure screen.
#[derive(Debug, Clone, Serialize)]
pub struct StructureListing {
    pub sections: Vec<section::Model>,
    pub items: Vec<item::Model>,
}

/// Fields for a new item. `None` on an optional flag means the default:
/// notes are required on fail, sort order 0, active.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub section_id: i32,
    pub title: String,
    pub instructions: Option<String>,
    pub requires_photo: bool,
    pub requires_note_on_fail: Option<bool>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Partial section update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SectionUpdate {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Partial item update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub requires_photo: Option<bool>,
    pub requires_note_on_fail: Option<bool>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

pub struct StructureAdmin {
    db: DatabaseConnection,
}

impl StructureAdmin {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Active sections for the employee section picker, name ascending.
    pub async fn list_sections(&self, _principal: &Principal) -> CoreResult<Vec<section::Model>> {
        Ok(section::Entity::find()
            .filter(section::Column::IsActive.eq(true))
            .order_by_asc(section::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Active items of one section in checklist order. An unknown section
    /// simply yields an empty list.
    pub async fn list_section_items(
        &self,
        _principal: &Principal,
        section_id: i32,
    ) -> CoreResult<Vec<item::Model>> {
        Ok(item::Entity::find()
            .filter(item::Column::SectionId.eq(section_id))
            .filter(item::Column::IsActive.eq(true))
            .order_by_asc(item::Column::SortOrder)
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Full structure, active or not, for the admin screen.
    pub async fn list_structure(&self, principal: &Principal) -> CoreResult<StructureListing> {
        require(principal, Action::ManageStructure)?;

        let sections = section::Entity::find()
            .order_by_asc(section::Column::Name)
            .all(&self.db)
            .await?;
        let items = item::Entity::find()
            .order_by_asc(item::Column::SectionId)
            .order_by_asc(item::Column::SortOrder)
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await?;
        Ok(StructureListing { sections, items })
    }

    /// Section names are stored trimmed and upper-cased.
    pub async fn create_section(
        &self,
        principal: &Principal,
        name: &str,
    ) -> CoreResult<section::Model> {
        require(principal, Action::ManageStructure)?;

        let name = name.trim().to_uppercase();
        if name.is_empty() {
            return Err(CoreError::invalid_input("missing field: name"));
        }

        Ok(section::ActiveModel {
            name: Set(name),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn update_section(
        &self,
        principal: &Principal,
        section_id: i32,
        update: SectionUpdate,
    ) -> CoreResult<section::Model> {
        require(principal, Action::ManageStructure)?;

        let model = section::Entity::find_by_id(section_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::not_found("section"))?;

        let mut active: section::ActiveModel = model.into();
        if let Some(name) = update.name {
            let name = name.trim().to_uppercase();
            if name.is_empty() {
                return Err(CoreError::invalid_input("missing field: name"));
            }
            active.name = Set(name);
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }
        Ok(active.update(&self.db).await?)
    }

    pub async fn create_item(
        &self,
        principal: &Principal,
        new: NewItem,
    ) -> CoreResult<item::Model> {
        require(principal, Action::ManageStructure)?;

        if section::Entity::find_by_id(new.section_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(CoreError::invalid_input("invalid section_id"));
        }

        let title = new.title.trim().to_owned();
        if title.is_empty() {
            return Err(CoreError::invalid_input("missing field: title"));
        }
        let instructions = new
            .instructions
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        Ok(item::ActiveModel {
            section_id: Set(new.section_id),
            title: Set(title),
            instructions: Set(instructions),
            requires_photo: Set(new.requires_photo),
            requires_note_on_fail: Set(new.requires_note_on_fail.unwrap_or(true)),
            sort_order: Set(new.sort_order.unwrap_or(0)),
            is_active: Set(new.is_active.unwrap_or(true)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn update_item(
        &self,
        principal: &Principal,
        item_id: i32,
        update: ItemUpdate,
    ) -> CoreResult<item::Model> {
        require(principal, Action::ManageStructure)?;

        let model = item::Entity::find_by_id(item_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::not_found("item"))?;

        let mut active: item::ActiveModel = model.into();
        if let Some(title) = update.title {
            let title = title.trim().to_owned();
            if title.is_empty() {
                return Err(CoreError::invalid_input("missing field: title"));
            }
            active.title = Set(title);
        }
        if let Some(instructions) = update.instructions {
            let trimmed = instructions.trim();
            active.instructions = Set((!trimmed.is_empty()).then(|| trimmed.to_owned()));
        }
        if let Some(requires_photo) = update.requires_photo {
            active.requires_photo = Set(requires_photo);
        }
        if let Some(requires_note_on_fail) = update.requires_note_on_fail {
            active.requires_note_on_fail = Set(requires_note_on_fail);
        }
        if let Some(sort_order) = update.sort_order {
            active.sort_order = Set(sort_order);
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }
        Ok(active.update(&self.db).await?)
    }

    /// Delete an item. Items with recorded entries are refused so history
    /// stays intact; `force` clears the dependent entries first, in the
    /// same transaction as the item itself.
    pub async fn delete_item(
        &self,
        principal: &Principal,
        item_id: i32,
        force: bool,
    ) -> CoreResult<()> {
        require(principal, Action::DeleteStructure)?;

        if item::Entity::find_by_id(item_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(CoreError::not_found("item"));
        }

        let dependents = entry::Entity::find()
            .filter(entry::Column::ItemId.eq(item_id))
            .count(&self.db)
            .await?;
        if dependents > 0 && !force {
            return Err(CoreError::conflict(
                "item already has recorded entries; deactivate it or force-delete",
                Some(codes::HAS_ENTRIES),
            ));
        }

        let txn = self.db.begin().await?;
        if force {
            entry::Entity::delete_many()
                .filter(entry::Column::ItemId.eq(item_id))
                .exec(&txn)
                .await?;
        }
        item::Entity::delete_by_id(item_id).exec(&txn).await?;
        txn.commit().await?;

        info!(item_id, force, "item deleted");
        Ok(())
    }

    /// Delete a section. Refused while items or runs still reference it;
    /// there is no forced path through here.
    pub async fn delete_section(&self, principal: &Principal, section_id: i32) -> CoreResult<()> {
        require(principal, Action::DeleteStructure)?;

        if section::Entity::find_by_id(section_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(CoreError::not_found("section"));
        }

        let items = item::Entity::find()
            .filter(item::Column::SectionId.eq(section_id))
            .count(&self.db)
            .await?;
        if items > 0 {
            return Err(CoreError::conflict(
                "section still has items; delete them first or deactivate the section",
                None,
            ));
        }

        let runs = run::Entity::find()
            .filter(run::Column::SectionId.eq(section_id))
            .count(&self.db)
            .await?;
        if runs > 0 {
            return Err(CoreError::conflict(
                "section has recorded runs; deactivate it instead of deleting",
                None,
            ));
        }

        section::Entity::delete_by_id(section_id).exec(&self.db).await?;
        info!(section_id, "section deleted");
        Ok(())
    }
}
