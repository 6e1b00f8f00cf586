//! Ownership and role boundaries across the operation surface

mod helpers;

use helpers::{entry_input, setup};
use pretty_assertions::assert_eq;
use rondas_core::domain::{EntryResult, Role, RunStatus};
use rondas_core::operations::runs::RunFilters;
use rondas_core::operations::structure::NewItem;
use rondas_core::ErrorKind;

#[tokio::test]
async fn only_owner_and_staff_may_touch_a_run() {
    let ctx = setup().await;
    let runs = ctx.core.runs();
    let run_id = runs
        .create_or_reuse(&ctx.employee, ctx.section_id)
        .await
        .unwrap()
        .run
        .id;

    // Another employee can neither write nor read it.
    let err = runs
        .upsert_entry(
            &ctx.outsider,
            run_id,
            entry_input(ctx.item_plain, EntryResult::Pass),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    let err = runs.submit(&ctx.outsider, run_id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    let err = runs.get_run(&ctx.outsider, run_id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    // Staff override: a supervisor can fill in and submit on behalf of
    // the employee.
    runs.upsert_entry(
        &ctx.supervisor,
        run_id,
        entry_input(ctx.item_plain, EntryResult::Pass),
    )
    .await
    .unwrap();
    let submitted = runs.submit(&ctx.supervisor, run_id).await.unwrap();
    assert_eq!(submitted.status, RunStatus::Submitted);

    // The owner can still read it afterwards.
    let detail = runs.get_run(&ctx.employee, run_id).await.unwrap();
    assert_eq!(detail.run.id, run_id);
}

#[tokio::test]
async fn review_listing_and_deletion_are_staff_only() {
    let ctx = setup().await;
    let runs = ctx.core.runs();
    let run_id = runs
        .create_or_reuse(&ctx.employee, ctx.section_id)
        .await
        .unwrap()
        .run
        .id;
    runs.upsert_entry(
        &ctx.employee,
        run_id,
        entry_input(ctx.item_plain, EntryResult::Pass),
    )
    .await
    .unwrap();
    runs.submit(&ctx.employee, run_id).await.unwrap();

    let err = runs
        .review(&ctx.employee, run_id, Some("self-review"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = runs
        .list_runs(&ctx.employee, RunFilters::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = runs.delete(&ctx.employee, run_id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = ctx
        .core
        .dashboard()
        .summary(&ctx.employee)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    // Supervisors clear all four.
    runs.review(&ctx.supervisor, run_id, Some("fine")).await.unwrap();
    let listed = runs
        .list_runs(&ctx.supervisor, RunFilters::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    ctx.core.dashboard().summary(&ctx.supervisor).await.unwrap();
    runs.delete(&ctx.supervisor, run_id).await.unwrap();
}

#[tokio::test]
async fn structure_writes_are_admin_only_but_deletes_are_staff() {
    let ctx = setup().await;
    let structure = ctx.core.structure();

    let err = structure
        .create_section(&ctx.supervisor, "Warehouse")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    let err = structure.list_structure(&ctx.supervisor).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    let err = structure
        .create_item(
            &ctx.supervisor,
            NewItem {
                section_id: ctx.section_id,
                title: "Door locks".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let section = structure.create_section(&ctx.admin, "Warehouse").await.unwrap();
    let item = structure
        .create_item(
            &ctx.admin,
            NewItem {
                section_id: section.id,
                title: "Door locks".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Deletion is open to supervisors as well.
    structure
        .delete_item(&ctx.supervisor, item.id, false)
        .await
        .unwrap();
    structure
        .delete_section(&ctx.supervisor, section.id)
        .await
        .unwrap();

    // Employees get neither.
    let err = structure
        .delete_item(&ctx.employee, ctx.item_plain, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn user_administration_is_admin_only() {
    let ctx = setup().await;
    let users = ctx.core.users();

    let err = users.list(&ctx.supervisor).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    let err = users
        .set_role(&ctx.supervisor, ctx.outsider.id, Role::Supervisor)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let listed = users.list(&ctx.admin).await.unwrap();
    assert_eq!(listed.len(), 4);

    let promoted = users
        .set_role(&ctx.admin, ctx.outsider.id, Role::Supervisor)
        .await
        .unwrap();
    assert_eq!(promoted.role, "supervisor");

    let err = users
        .set_role(&ctx.admin, 313370, Role::Admin)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn duplicate_emails_conflict() {
    let ctx = setup().await;
    let users = ctx.core.users();

    users
        .create(&ctx.admin, "Nina New", "nina@example.com", Role::Employee)
        .await
        .unwrap();
    let err = users
        .create(&ctx.admin, "Nina Again", "  NINA@example.com ", Role::Employee)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}
