//! 提交存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::marks::{Column as MarkColumn, Entity as Marks};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo, PaginationQuery,
    reports::entities::LetterGrade,
    submissions::{
        entities::{DUPLICATE_SUBMISSION_MESSAGE, NewSubmission, Submission, SubmissionTuple},
        requests::SubmissionListQuery,
        responses::{SubmissionListItem, SubmissionListResponse, SubmissionMarkInfo},
    },
};
use crate::utils::{escape_like_pattern, format_file_size};
use sea_orm::sea_query::{Expr, ExprTrait, Func, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};

impl SeaOrmStorage {
    /// 写入提交记录
    ///
    /// 唯一索引是查重的最终依据，冲突时返回与预检查相同的 Conflict。
    pub async fn create_submission_impl(&self, req: NewSubmission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_name: Set(req.student_name),
            class_name: Set(req.class_name),
            section: Set(req.section),
            file_name: Set(req.file_name),
            extension: Set(req.extension.to_lowercase()),
            storage_key: Set(req.storage_key),
            file_size: Set(req.file_size),
            mime_type: Set(req.mime_type),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
                PortalError::conflict(DUPLICATE_SUBMISSION_MESSAGE)
            } else {
                PortalError::database_operation(format!("创建提交失败: {e}"))
            }
        })?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 四元组精确匹配
    pub async fn submission_exists_impl(&self, tuple: &SubmissionTuple) -> Result<bool> {
        let count = Submissions::find()
            .filter(Column::StudentName.eq(&tuple.student_name))
            .filter(Column::ClassName.eq(&tuple.class_name))
            .filter(Column::Section.eq(&tuple.section))
            .filter(Column::FileName.eq(&tuple.file_name))
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查重查询失败: {e}")))?;

        Ok(count > 0)
    }

    /// 最近的提交
    pub async fn list_recent_submissions_impl(&self, limit: u64) -> Result<Vec<Submission>> {
        let results = Submissions::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询最近提交失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 列出提交（分页，合并评分）
    pub async fn list_submissions_with_pagination_impl(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        let (page, size) = PaginationQuery {
            page: query.page,
            size: query.size,
        }
        .normalized();

        let mut select = Submissions::find();

        if let Some(ref class_name) = query.class_name {
            select = select.filter(Column::ClassName.eq(class_name));
        }

        if let Some(ref section) = query.section {
            select = select.filter(Column::Section.eq(section));
        }

        // 姓名子串，不区分大小写
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(&search.trim().to_lowercase());
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(Column::StudentName)))
                    .like(format!("%{escaped}%")),
            );
        }

        // 是否已评分
        if let Some(graded) = query.graded {
            let graded_ids = Query::select()
                .column(MarkColumn::SubmissionId)
                .from(Marks)
                .to_owned();
            select = if graded {
                select.filter(Column::Id.in_subquery(graded_ids))
            } else {
                select.filter(Column::Id.not_in_subquery(graded_ids))
            };
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交总数失败: {e}")))?;

        let submissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交列表失败: {e}")))?;

        // 批量查询评分
        let ids: Vec<i64> = submissions.iter().map(|s| s.id).collect();
        let marks = Marks::find()
            .filter(MarkColumn::SubmissionId.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询评分失败: {e}")))?;

        let mut mark_map: HashMap<i64, SubmissionMarkInfo> = HashMap::new();
        for m in marks {
            let submission_id = m.submission_id;
            let mark = m.try_into_mark()?;
            mark_map.insert(
                submission_id,
                SubmissionMarkInfo {
                    score: mark.score,
                    grade: LetterGrade::from_score(mark.score),
                    updated_at: mark.updated_at,
                },
            );
        }

        let items = submissions
            .into_iter()
            .map(|m| {
                let submission = m.into_submission();
                let size = std::cmp::Ord::max(submission.file_size, 0) as u64;
                SubmissionListItem {
                    file_size_display: format_file_size(size),
                    mark: mark_map.remove(&submission.id),
                    submission,
                }
            })
            .collect();

        Ok(SubmissionListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::sample_submission as new_submission;

    #[tokio::test]
    async fn test_create_and_get_submission() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let created = storage
            .create_submission_impl(new_submission("Asha", "10th", "A", "hw1.py"))
            .await
            .unwrap();

        let fetched = storage
            .get_submission_by_id_impl(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.student_name, "Asha");
        assert_eq!(fetched.extension, "py");
        assert!(storage.get_submission_by_id_impl(created.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exists_requires_all_four_fields() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let created = storage
            .create_submission_impl(new_submission("Asha", "10th", "A", "hw1.py"))
            .await
            .unwrap();

        assert!(storage.submission_exists_impl(&created.tuple()).await.unwrap());

        let mut other = created.tuple();
        other.section = "B".to_string();
        assert!(!storage.submission_exists_impl(&other).await.unwrap());

        let mut other = created.tuple();
        other.file_name = "hw2.py".to_string();
        assert!(!storage.submission_exists_impl(&other).await.unwrap());
    }

    #[tokio::test]
    async fn test_unique_index_maps_to_conflict() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_submission_impl(new_submission("Asha", "10th", "A", "hw1.py"))
            .await
            .unwrap();

        let err = storage
            .create_submission_impl(new_submission("Asha", "10th", "A", "hw1.py"))
            .await
            .unwrap_err();
        assert_eq!(err, PortalError::conflict(DUPLICATE_SUBMISSION_MESSAGE));
    }

    #[tokio::test]
    async fn test_list_filters_and_mark_join() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let asha = storage
            .create_submission_impl(new_submission("Asha", "10th", "A", "hw1.py"))
            .await
            .unwrap();
        storage
            .create_submission_impl(new_submission("Ravi", "10th", "B", "hw1.py"))
            .await
            .unwrap();
        storage
            .create_submission_impl(new_submission("Meera", "9th", "A", "hw1.py"))
            .await
            .unwrap();
        storage.upsert_mark_impl(&asha, 91, None).await.unwrap();

        let all = storage
            .list_submissions_with_pagination_impl(SubmissionListQuery::default())
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 3);

        let tenth = storage
            .list_submissions_with_pagination_impl(SubmissionListQuery {
                class_name: Some("10th".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(tenth.items.len(), 2);

        let search = storage
            .list_submissions_with_pagination_impl(SubmissionListQuery {
                search: Some("ASH".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(search.items.len(), 1);
        assert_eq!(
            search.items[0].file_size_display,
            format_file_size(asha.file_size as u64)
        );
        let mark = search.items[0].mark.as_ref().unwrap();
        assert_eq!(mark.score, 91);
        assert_eq!(mark.grade, LetterGrade::APlus);

        let graded = storage
            .list_submissions_with_pagination_impl(SubmissionListQuery {
                graded: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(graded.items.len(), 1);
        assert_eq!(graded.items[0].submission.id, asha.id);

        let ungraded = storage
            .list_submissions_with_pagination_impl(SubmissionListQuery {
                graded: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ungraded.items.len(), 2);
        assert!(ungraded.items.iter().all(|i| i.mark.is_none()));
    }

    #[tokio::test]
    async fn test_list_pagination_clamps_size() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        for i in 0..3 {
            storage
                .create_submission_impl(new_submission("Asha", "10th", "A", &format!("hw{i}.py")))
                .await
                .unwrap();
        }

        let page = storage
            .list_submissions_with_pagination_impl(SubmissionListQuery {
                page: Some(2),
                size: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.total_pages, 2);

        let clamped = storage
            .list_submissions_with_pagination_impl(SubmissionListQuery {
                size: Some(0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(clamped.pagination.page_size, 1);
    }
}
