use std::sync::Arc;

use crate::models::{
    admins::entities::Admin,
    extensions::entities::ExtensionPolicy,
    marks::entities::{Mark, MarkFilter},
    submissions::{
        entities::{NewSubmission, Submission, SubmissionTuple},
        requests::SubmissionListQuery,
        responses::SubmissionListResponse,
    },
};

use crate::errors::Result;

pub mod blob;
pub mod sea_orm_storage;

pub use blob::{BlobStore, LocalBlobStore};

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 提交管理方法
    // 写入提交记录（四元组唯一索引冲突时返回 Conflict）
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 四元组是否已存在
    async fn submission_exists(&self, tuple: &SubmissionTuple) -> Result<bool>;
    // 列出提交（合并评分）
    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse>;
    // 最近的提交，按时间倒序
    async fn list_recent_submissions(&self, limit: u64) -> Result<Vec<Submission>>;

    /// 评分方法
    // 按提交ID写入或覆盖评分
    async fn upsert_mark(
        &self,
        submission: &Submission,
        score: i32,
        graded_by: Option<i64>,
    ) -> Result<Mark>;
    // 获取提交的评分
    async fn get_mark_by_submission_id(&self, submission_id: i64) -> Result<Option<Mark>>;
    // 列出评分
    async fn list_marks(&self, filter: MarkFilter) -> Result<Vec<Mark>>;

    /// 扩展名策略方法
    async fn list_extension_policies(&self) -> Result<Vec<ExtensionPolicy>>;
    async fn get_extension_policy_by_extension(
        &self,
        extension: &str,
    ) -> Result<Option<ExtensionPolicy>>;
    // 设置启用状态，记录不存在时返回 None
    async fn set_extension_enabled(
        &self,
        id: i64,
        enabled: bool,
        updated_by: Option<i64>,
    ) -> Result<Option<ExtensionPolicy>>;

    /// 管理员方法
    async fn create_admin(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<String>,
    ) -> Result<Admin>;
    async fn get_admin_by_id(&self, id: i64) -> Result<Option<Admin>>;
    async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>>;
    async fn count_admins(&self) -> Result<u64>;
    // 更新最后登录时间
    async fn update_admin_last_login(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
