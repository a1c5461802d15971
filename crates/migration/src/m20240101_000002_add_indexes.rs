//! Secondary indexes for the search filters (site, state, name).
use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_machines::Machines;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_machines_site")
                    .table(Machines::Table)
                    .col(Machines::Site)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_machines_state")
                    .table(Machines::Table)
                    .col(Machines::State)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_machines_name")
                    .table(Machines::Table)
                    .col(Machines::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_machines_name").table(Machines::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_machines_state").table(Machines::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_machines_site").table(Machines::Table).to_owned())
            .await
    }
}
