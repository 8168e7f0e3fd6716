//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod admins;
mod extension_policies;
mod marks;
mod submissions;

use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| PortalError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PortalError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(PortalError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 测试用内存数据库（单连接，已执行迁移）
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("内存数据库连接失败: {e}")))?;
        Migrator::up(&db, None)
            .await
            .map_err(|e| PortalError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }
}

/// 测试用提交样例
#[cfg(test)]
pub(crate) fn sample_submission(
    student: &str,
    class: &str,
    section: &str,
    file: &str,
) -> crate::models::submissions::entities::NewSubmission {
    crate::models::submissions::entities::NewSubmission {
        student_name: student.to_string(),
        class_name: class.to_string(),
        section: section.to_string(),
        file_name: file.to_string(),
        extension: "py".to_string(),
        storage_key: format!("{class}/{section}/{}-{file}", uuid::Uuid::new_v4()),
        file_size: 12,
        mime_type: "text/x-python".to_string(),
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn submission_exists(&self, tuple: &SubmissionTuple) -> Result<bool> {
        self.submission_exists_impl(tuple).await
    }

    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        self.list_submissions_with_pagination_impl(query).await
    }

    async fn list_recent_submissions(&self, limit: u64) -> Result<Vec<Submission>> {
        self.list_recent_submissions_impl(limit).await
    }

    // 评分模块
    async fn upsert_mark(
        &self,
        submission: &Submission,
        score: i32,
        graded_by: Option<i64>,
    ) -> Result<Mark> {
        self.upsert_mark_impl(submission, score, graded_by).await
    }

    async fn get_mark_by_submission_id(&self, submission_id: i64) -> Result<Option<Mark>> {
        self.get_mark_by_submission_id_impl(submission_id).await
    }

    async fn list_marks(&self, filter: MarkFilter) -> Result<Vec<Mark>> {
        self.list_marks_impl(filter).await
    }

    // 扩展名策略模块
    async fn list_extension_policies(&self) -> Result<Vec<ExtensionPolicy>> {
        self.list_extension_policies_impl().await
    }

    async fn get_extension_policy_by_extension(
        &self,
        extension: &str,
    ) -> Result<Option<ExtensionPolicy>> {
        self.get_extension_policy_by_extension_impl(extension).await
    }

    async fn set_extension_enabled(
        &self,
        id: i64,
        enabled: bool,
        updated_by: Option<i64>,
    ) -> Result<Option<ExtensionPolicy>> {
        self.set_extension_enabled_impl(id, enabled, updated_by)
            .await
    }

    // 管理员模块
    async fn create_admin(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<String>,
    ) -> Result<Admin> {
        self.create_admin_impl(email, password_hash, display_name)
            .await
    }

    async fn get_admin_by_id(&self, id: i64) -> Result<Option<Admin>> {
        self.get_admin_by_id_impl(id).await
    }

    async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        self.get_admin_by_email_impl(email).await
    }

    async fn count_admins(&self) -> Result<u64> {
        self.count_admins_impl().await
    }

    async fn update_admin_last_login(&self, id: i64) -> Result<bool> {
        self.update_admin_last_login_impl(id).await
    }
}
