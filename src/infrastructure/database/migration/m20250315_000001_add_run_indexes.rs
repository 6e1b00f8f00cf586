//! Indexes for the hot run lookups: the create-or-reuse probe, newest-first
//! listings, and the item-deletion dependency scan.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_check_runs_employee_section_status")
                    .table(CheckRuns::Table)
                    .col(CheckRuns::EmployeeId)
                    .col(CheckRuns::SectionId)
                    .col(CheckRuns::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_check_runs_started_at")
                    .table(CheckRuns::Table)
                    .col(CheckRuns::StartedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_check_entries_item")
                    .table(CheckEntries::Table)
                    .col(CheckEntries::ItemId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_check_entries_item")
                    .table(CheckEntries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_check_runs_started_at")
                    .table(CheckRuns::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_check_runs_employee_section_status")
                    .table(CheckRuns::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum CheckRuns {
    Table,
    EmployeeId,
    SectionId,
    Status,
    StartedAt,
}

#[derive(DeriveIden)]
enum CheckEntries {
    Table,
    ItemId,
}
