use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 provider_credentials 表 - 每个提供商一行 OAuth 应用凭据
        manager
            .create_table(
                Table::create()
                    .table(ProviderCredentials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProviderCredentials::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProviderCredentials::ProviderKey)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ProviderCredentials::ClientId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderCredentials::ClientSecretEnc)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProviderCredentials::Scopes).text())
                    .col(
                        ColumnDef::new(ProviderCredentials::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ProviderCredentials::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderCredentials::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProviderCredentials::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProviderCredentials {
    Table,
    Id,
    ProviderKey,
    ClientId,
    ClientSecretEnc,
    Scopes,
    Enabled,
    CreatedAt,
    UpdatedAt,
}
