//! Migration: soft delete column for `tb_users`.

use sea_orm_migration::prelude::*;

use super::TbUsers;

const DELETED_AT_INDEX: &str = "idx_users_deleted_at";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(TbUsers::Table)
                    .add_column(
                        ColumnDef::new(TbUsers::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(DELETED_AT_INDEX)
                    .table(TbUsers::Table)
                    .col(TbUsers::DeletedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(DELETED_AT_INDEX)
                    .table(TbUsers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(TbUsers::Table)
                    .drop_column(TbUsers::DeletedAt)
                    .to_owned(),
            )
            .await
    }
}
