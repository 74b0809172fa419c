use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 connections 表 - 已建立的授权，(provider_key, external_id) 唯一
        manager
            .create_table(
                Table::create()
                    .table(Connections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Connections::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Connections::ProviderKey)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Connections::ExternalId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Connections::AccessTokenEnc)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Connections::RefreshTokenEnc).text())
                    .col(ColumnDef::new(Connections::TokenExpiresAt).date_time())
                    .col(
                        ColumnDef::new(Connections::Scopes)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Connections::RawResponseEnc)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Connections::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Connections::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 重连走 upsert，(provider_key, external_id) 必须唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_connections_provider_external")
                    .table(Connections::Table)
                    .col(Connections::ProviderKey)
                    .col(Connections::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Connections::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Connections {
    Table,
    Id,
    ProviderKey,
    ExternalId,
    AccessTokenEnc,
    RefreshTokenEnc,
    TokenExpiresAt,
    Scopes,
    RawResponseEnc,
    CreatedAt,
    UpdatedAt,
}
