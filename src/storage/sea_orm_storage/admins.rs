use super::SeaOrmStorage;
use crate::entity::admins::{ActiveModel, Column, Entity as Admins};
use crate::errors::{PortalError, Result};
use crate::models::admins::entities::Admin;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建管理员
    pub async fn create_admin_impl(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<String>,
    ) -> Result<Admin> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            email: Set(email.to_lowercase()),
            password_hash: Set(password_hash.to_string()),
            display_name: Set(display_name),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建管理员失败: {e}")))?;

        Ok(result.into_admin())
    }

    /// 通过 ID 获取管理员
    pub async fn get_admin_by_id_impl(&self, id: i64) -> Result<Option<Admin>> {
        let result = Admins::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询管理员失败: {e}")))?;

        Ok(result.map(|m| m.into_admin()))
    }

    /// 通过邮箱获取管理员（不区分大小写）
    pub async fn get_admin_by_email_impl(&self, email: &str) -> Result<Option<Admin>> {
        let result = Admins::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询管理员失败: {e}")))?;

        Ok(result.map(|m| m.into_admin()))
    }

    pub async fn count_admins_impl(&self) -> Result<u64> {
        Admins::find()
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计管理员失败: {e}")))
    }

    /// 更新最后登录时间
    pub async fn update_admin_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Admins::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_admin_lifecycle() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        assert_eq!(storage.count_admins_impl().await.unwrap(), 0);

        let admin = storage
            .create_admin_impl("Admin@School.test", "hash", Some("Admin".to_string()))
            .await
            .unwrap();
        assert_eq!(admin.email, "admin@school.test");
        assert!(admin.last_login.is_none());
        assert_eq!(storage.count_admins_impl().await.unwrap(), 1);

        let by_email = storage
            .get_admin_by_email_impl("ADMIN@school.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, admin.id);

        assert!(storage.update_admin_last_login_impl(admin.id).await.unwrap());
        assert!(!storage.update_admin_last_login_impl(admin.id + 1).await.unwrap());
        let reloaded = storage.get_admin_by_id_impl(admin.id).await.unwrap().unwrap();
        assert!(reloaded.last_login.is_some());
    }
}
