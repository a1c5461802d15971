//! Create `machines` table.
//!
//! One row per machine record; the id is the only uniqueness constraint.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Machines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Machines::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Machines::Name, 100).not_null())
                    .col(string_len(Machines::Site, 50).not_null())
                    .col(timestamp_with_time_zone(Machines::InstalledAt).not_null())
                    .col(string_len(Machines::State, 32).not_null())
                    .col(ColumnDef::new(Machines::Description).string_len(500).null())
                    .col(ColumnDef::new(Machines::Model).string_len(100).null())
                    .col(ColumnDef::new(Machines::Manufacturer).string_len(100).null())
                    .col(ColumnDef::new(Machines::SerialNumber).string_len(100).null())
                    .col(timestamp_with_time_zone(Machines::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Machines::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Machines::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum Machines {
    Table,
    Id,
    Name,
    Site,
    InstalledAt,
    State,
    Description,
    Model,
    Manufacturer,
    SerialNumber,
    CreatedAt,
    UpdatedAt,
}
