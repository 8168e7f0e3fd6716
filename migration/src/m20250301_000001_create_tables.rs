use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建管理员表
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admins::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Admins::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Admins::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Admins::DisplayName).string().null())
                    .col(ColumnDef::new(Admins::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Admins::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Submissions::StudentName).string().not_null())
                    .col(ColumnDef::new(Submissions::ClassName).string().not_null())
                    .col(ColumnDef::new(Submissions::Section).string().not_null())
                    .col(ColumnDef::new(Submissions::FileName).string().not_null())
                    .col(ColumnDef::new(Submissions::Extension).string().not_null())
                    .col(
                        ColumnDef::new(Submissions::StorageKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Submissions::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::MimeType).string().not_null())
                    .col(
                        ColumnDef::new(Submissions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一学生、班级、分组下文件名唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_submissions_student_class_section_file")
                    .table(Submissions::Table)
                    .col(Submissions::StudentName)
                    .col(Submissions::ClassName)
                    .col(Submissions::Section)
                    .col(Submissions::FileName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_class_section")
                    .table(Submissions::Table)
                    .col(Submissions::ClassName)
                    .col(Submissions::Section)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_created_at")
                    .table(Submissions::Table)
                    .col(Submissions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 创建评分表（每个提交最多一条）
        manager
            .create_table(
                Table::create()
                    .table(Marks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Marks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Marks::SubmissionId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Marks::StudentName).string().not_null())
                    .col(ColumnDef::new(Marks::ClassName).string().not_null())
                    .col(ColumnDef::new(Marks::Section).string().not_null())
                    .col(ColumnDef::new(Marks::Score).integer().not_null())
                    .col(ColumnDef::new(Marks::GradedBy).big_integer().null())
                    .col(ColumnDef::new(Marks::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Marks::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Marks::Table, Marks::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_marks_class_section")
                    .table(Marks::Table)
                    .col(Marks::ClassName)
                    .col(Marks::Section)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Marks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Admins {
    #[sea_orm(iden = "admins")]
    Table,
    Id,
    Email,
    PasswordHash,
    DisplayName,
    LastLogin,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    StudentName,
    ClassName,
    Section,
    FileName,
    Extension,
    StorageKey,
    FileSize,
    MimeType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Marks {
    #[sea_orm(iden = "marks")]
    Table,
    Id,
    SubmissionId,
    StudentName,
    ClassName,
    Section,
    Score,
    GradedBy,
    CreatedAt,
    UpdatedAt,
}
