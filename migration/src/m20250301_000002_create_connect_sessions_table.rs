use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 connect_sessions 表 - 存储进行中的授权流程
        manager
            .create_table(
                Table::create()
                    .table(ConnectSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConnectSessions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ConnectSessions::SessionToken)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ConnectSessions::ProviderKey)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConnectSessions::ExternalId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConnectSessions::State)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ConnectSessions::CodeVerifier).string_len(128))
                    .col(
                        ColumnDef::new(ConnectSessions::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ConnectSessions::RedirectUri).text())
                    .col(
                        ColumnDef::new(ConnectSessions::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConnectSessions::ExpiresAt)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // state 按 pending 状态查询，建立辅助索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_connect_sessions_state_status")
                    .table(ConnectSessions::Table)
                    .col(ConnectSessions::State)
                    .col(ConnectSessions::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ConnectSessions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ConnectSessions {
    Table,
    Id,
    SessionToken,
    ProviderKey,
    ExternalId,
    State,
    CodeVerifier,
    Status,
    RedirectUri,
    CreatedAt,
    ExpiresAt,
}
