use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 扩展名策略表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ExtensionPolicies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExtensionPolicies::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExtensionPolicies::Extension)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ExtensionPolicies::MimeType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExtensionPolicies::Enabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ExtensionPolicies::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExtensionPolicies::UpdatedBy)
                            .big_integer()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 插入默认扩展名 ====================
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        let default_policies = [
            ("py", "text/x-python", true),
            ("doc", "application/msword", false),
            (
                "docx",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                false,
            ),
            ("ppt", "application/vnd.ms-powerpoint", false),
            (
                "pptx",
                "application/vnd.openxmlformats-officedocument.presentationml.presentation",
                false,
            ),
            ("pdf", "application/pdf", false),
            ("xls", "application/vnd.ms-excel", false),
            (
                "xlsx",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                false,
            ),
        ];

        for (extension, mime_type, enabled) in default_policies {
            let insert = Query::insert()
                .into_table(ExtensionPolicies::Table)
                .columns([
                    ExtensionPolicies::Extension,
                    ExtensionPolicies::MimeType,
                    ExtensionPolicies::Enabled,
                    ExtensionPolicies::UpdatedAt,
                ])
                .values_panic([
                    extension.into(),
                    mime_type.into(),
                    enabled.into(),
                    now.into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExtensionPolicies::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ExtensionPolicies {
    #[sea_orm(iden = "extension_policies")]
    Table,
    Id,
    Extension,
    MimeType,
    Enabled,
    UpdatedAt,
    UpdatedBy,
}
