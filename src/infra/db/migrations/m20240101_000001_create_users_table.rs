//! Migration: create the `tb_users` table.

use sea_orm::DatabaseBackend;
use sea_orm_migration::prelude::*;

use super::TbUsers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite only auto-increments an INTEGER PRIMARY KEY, which is already 64-bit
        let mut id = ColumnDef::new(TbUsers::Id);
        match manager.get_database_backend() {
            DatabaseBackend::Sqlite => id.integer(),
            _ => id.big_integer(),
        };
        id.not_null().auto_increment().primary_key();

        manager
            .create_table(
                Table::create()
                    .table(TbUsers::Table)
                    .if_not_exists()
                    .col(&mut id)
                    .col(
                        ColumnDef::new(TbUsers::Username)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TbUsers::Password).string_len(255).not_null())
                    .col(
                        ColumnDef::new(TbUsers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TbUsers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TbUsers::Table).to_owned())
            .await
    }
}
