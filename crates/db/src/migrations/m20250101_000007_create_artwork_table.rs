//! Create artwork table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Artwork::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Artwork::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Artwork::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Artwork::Title).string_len(128).not_null())
                    .col(ColumnDef::new(Artwork::Description).text())
                    .col(ColumnDef::new(Artwork::Medium).string_len(32).not_null())
                    .col(ColumnDef::new(Artwork::ImageUrl).string_len(1024).not_null())
                    .col(
                        ColumnDef::new(Artwork::Tags)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Artwork::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artwork_user")
                            .from(Artwork::Table, Artwork::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_artwork_user_id")
                    .table(Artwork::Table)
                    .col(Artwork::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_artwork_medium")
                    .table(Artwork::Table)
                    .col(Artwork::Medium)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Artwork::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Artwork {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Medium,
    ImageUrl,
    Tags,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
