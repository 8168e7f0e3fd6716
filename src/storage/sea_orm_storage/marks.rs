//! 评分存储操作

use super::SeaOrmStorage;
use crate::entity::marks::{ActiveModel, Column, Entity as Marks};
use crate::errors::{PortalError, Result};
use crate::models::{
    marks::entities::{Mark, MarkFilter},
    submissions::entities::Submission,
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 写入或覆盖评分（单条 upsert 语句，以 submission_id 为冲突键）
    pub async fn upsert_mark_impl(
        &self,
        submission: &Submission,
        score: i32,
        graded_by: Option<i64>,
    ) -> Result<Mark> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            submission_id: Set(submission.id),
            student_name: Set(submission.student_name.clone()),
            class_name: Set(submission.class_name.clone()),
            section: Set(submission.section.clone()),
            score: Set(score),
            graded_by: Set(graded_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Marks::insert(model)
            .on_conflict(
                OnConflict::column(Column::SubmissionId)
                    .update_columns([
                        Column::StudentName,
                        Column::ClassName,
                        Column::Section,
                        Column::Score,
                        Column::GradedBy,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("写入评分失败: {e}")))?;

        self.get_mark_by_submission_id_impl(submission.id)
            .await?
            .ok_or_else(|| {
                PortalError::database_operation(format!(
                    "提交 {} 的评分写入后未能读取",
                    submission.id
                ))
            })
    }

    /// 获取提交的评分
    pub async fn get_mark_by_submission_id_impl(&self, submission_id: i64) -> Result<Option<Mark>> {
        let result = Marks::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询评分失败: {e}")))?;

        result.map(|m| m.try_into_mark()).transpose()
    }

    /// 列出评分，按创建时间倒序、ID 倒序
    pub async fn list_marks_impl(&self, filter: MarkFilter) -> Result<Vec<Mark>> {
        let mut select = Marks::find();

        if let Some(ref class_name) = filter.class_name {
            select = select.filter(Column::ClassName.eq(class_name));
        }

        if let Some(ref section) = filter.section {
            select = select.filter(Column::Section.eq(section));
        }

        let results = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询评分列表失败: {e}")))?;

        results.into_iter().map(|m| m.try_into_mark()).collect()
    }
}
