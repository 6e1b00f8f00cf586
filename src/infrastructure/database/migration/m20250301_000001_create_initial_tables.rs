//! Initial migration: users, sections, items, runs and entries

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sections::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sections::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Sections::Name).string().not_null())
                    .col(ColumnDef::new(Sections::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Sections::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CheckItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CheckItems::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(CheckItems::SectionId).integer().not_null())
                    .col(ColumnDef::new(CheckItems::Title).string().not_null())
                    .col(ColumnDef::new(CheckItems::Instructions).string())
                    .col(ColumnDef::new(CheckItems::RequiresPhoto).boolean().not_null().default(false))
                    .col(ColumnDef::new(CheckItems::RequiresNoteOnFail).boolean().not_null().default(true))
                    .col(ColumnDef::new(CheckItems::SortOrder).integer().not_null().default(0))
                    .col(ColumnDef::new(CheckItems::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(CheckItems::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(CheckItems::Table, CheckItems::SectionId)
                            .to(Sections::Table, Sections::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CheckRuns::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CheckRuns::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(CheckRuns::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(CheckRuns::SectionId).integer().not_null())
                    .col(ColumnDef::new(CheckRuns::Status).string().not_null())
                    .col(ColumnDef::new(CheckRuns::StartedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(CheckRuns::SubmittedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CheckRuns::ReviewedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CheckRuns::ReviewedBy).integer())
                    .col(ColumnDef::new(CheckRuns::ReviewNote).string())
                    .foreign_key(
                        ForeignKey::create()
                            .from(CheckRuns::Table, CheckRuns::EmployeeId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CheckRuns::Table, CheckRuns::SectionId)
                            .to(Sections::Table, Sections::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CheckRuns::Table, CheckRuns::ReviewedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CheckEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CheckEntries::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(CheckEntries::RunId).integer().not_null())
                    .col(ColumnDef::new(CheckEntries::ItemId).integer().not_null())
                    .col(ColumnDef::new(CheckEntries::Result).string().not_null())
                    .col(ColumnDef::new(CheckEntries::Note).string())
                    .col(ColumnDef::new(CheckEntries::PhotoUrl).string())
                    .col(ColumnDef::new(CheckEntries::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(CheckEntries::Table, CheckEntries::RunId)
                            .to(CheckRuns::Table, CheckRuns::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CheckEntries::Table, CheckEntries::ItemId)
                            .to(CheckItems::Table, CheckItems::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One entry per (run, item); the upsert's conflict target.
        manager
            .create_index(
                Index::create()
                    .name("uq_check_entries_run_item")
                    .table(CheckEntries::Table)
                    .col(CheckEntries::RunId)
                    .col(CheckEntries::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CheckEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CheckRuns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CheckItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sections::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    FullName,
    Email,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Sections {
    Table,
    Id,
    Name,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CheckItems {
    Table,
    Id,
    SectionId,
    Title,
    Instructions,
    RequiresPhoto,
    RequiresNoteOnFail,
    SortOrder,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CheckRuns {
    Table,
    Id,
    EmployeeId,
    SectionId,
    Status,
    StartedAt,
    SubmittedAt,
    ReviewedAt,
    ReviewedBy,
    ReviewNote,
}

#[derive(DeriveIden)]
enum CheckEntries {
    Table,
    Id,
    RunId,
    ItemId,
    Result,
    Note,
    PhotoUrl,
    CreatedAt,
}
