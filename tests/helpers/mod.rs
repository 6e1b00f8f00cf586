//! Shared fixtures for integration tests
#![allow(dead_code)]

use chrono::Utc;
use rondas_core::domain::{EntryResult, PhotoInput, Principal, Role};
use rondas_core::infrastructure::database::entities::{item, section, user};
use rondas_core::operations::runs::EntryUpsert;
use rondas_core::Core;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tempfile::TempDir;

/// A core backed by a throwaway data directory, with one section of three
/// items and a user per role.
pub struct TestCtx {
    pub core: Core,
    pub admin: Principal,
    pub supervisor: Principal,
    pub employee: Principal,
    pub outsider: Principal,
    pub section_id: i32,
    /// No requirements.
    pub item_plain: i32,
    /// `requires_photo = true`.
    pub item_photo: i32,
    /// `requires_note_on_fail = true`.
    pub item_note: i32,
    _dir: TempDir,
}

pub async fn setup() -> TestCtx {
    let dir = TempDir::new().expect("temp dir");
    let core = Core::new_with_config(dir.path().to_path_buf())
        .await
        .expect("core init");

    let (admin, supervisor, employee, outsider, section_id, item_plain, item_photo, item_note) = {
        let db = core.db().conn();

        let admin = seed_user(db, "Ada Admin", "ada@example.com", Role::Admin).await;
        let supervisor = seed_user(db, "Sam Super", "sam@example.com", Role::Supervisor).await;
        let employee = seed_user(db, "Eli Employee", "eli@example.com", Role::Employee).await;
        let outsider = seed_user(db, "Omar Other", "omar@example.com", Role::Employee).await;

        let section = section::ActiveModel {
            name: Set("KITCHEN".to_owned()),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("seed section");

        let item_plain = seed_item(db, section.id, "Floor clean", false, false, 1).await;
        let item_photo = seed_item(db, section.id, "Fridge temperature logged", true, false, 2).await;
        let item_note = seed_item(db, section.id, "Surfaces sanitized", false, true, 3).await;

        (
            admin, supervisor, employee, outsider, section.id, item_plain, item_photo, item_note,
        )
    };

    TestCtx {
        core,
        admin,
        supervisor,
        employee,
        outsider,
        section_id,
        item_plain,
        item_photo,
        item_note,
        _dir: dir,
    }
}

pub async fn seed_user(
    db: &DatabaseConnection,
    full_name: &str,
    email: &str,
    role: Role,
) -> Principal {
    let model = user::ActiveModel {
        full_name: Set(full_name.to_owned()),
        email: Set(email.to_owned()),
        role: Set(role.as_ref().to_owned()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed user");
    Principal::new(model.id, role)
}

pub async fn seed_item(
    db: &DatabaseConnection,
    section_id: i32,
    title: &str,
    requires_photo: bool,
    requires_note_on_fail: bool,
    sort_order: i32,
) -> i32 {
    item::ActiveModel {
        section_id: Set(section_id),
        title: Set(title.to_owned()),
        instructions: Set(None),
        requires_photo: Set(requires_photo),
        requires_note_on_fail: Set(requires_note_on_fail),
        sort_order: Set(sort_order),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed item")
    .id
}

/// Entry input with no note and no photo.
pub fn entry_input(item_id: i32, result: EntryResult) -> EntryUpsert {
    EntryUpsert {
        item_id,
        result,
        note: None,
        photo: PhotoInput::None,
    }
}

/// Entry input carrying a fresh photo upload.
pub fn entry_with_photo(item_id: i32, result: EntryResult) -> EntryUpsert {
    EntryUpsert {
        item_id,
        result,
        note: None,
        photo: PhotoInput::Upload {
            bytes: b"\xFF\xD8\xFF fake jpeg".to_vec(),
            content_type: "image/jpeg".to_owned(),
        },
    }
}

/// Entry input carrying a note.
pub fn entry_with_note(item_id: i32, result: EntryResult, note: &str) -> EntryUpsert {
    EntryUpsert {
        item_id,
        result,
        note: Some(note.to_owned()),
        photo: PhotoInput::None,
    }
}
