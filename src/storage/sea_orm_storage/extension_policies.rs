//! 扩展名策略存储操作

use super::SeaOrmStorage;
use crate::entity::extension_policies::{Column, Entity as ExtensionPolicies};
use crate::errors::{PortalError, Result};
use crate::models::extensions::entities::{ExtensionPolicy, normalize_extension};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 列出全部策略（按种子顺序）
    pub async fn list_extension_policies_impl(&self) -> Result<Vec<ExtensionPolicy>> {
        let results = ExtensionPolicies::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询扩展名策略失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_policy()).collect())
    }

    /// 通过扩展名获取策略
    pub async fn get_extension_policy_by_extension_impl(
        &self,
        extension: &str,
    ) -> Result<Option<ExtensionPolicy>> {
        let result = ExtensionPolicies::find()
            .filter(Column::Extension.eq(normalize_extension(extension)))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询扩展名策略失败: {e}")))?;

        Ok(result.map(|m| m.into_policy()))
    }

    /// 设置启用状态，时间戳单调不减
    pub async fn set_extension_enabled_impl(
        &self,
        id: i64,
        enabled: bool,
        updated_by: Option<i64>,
    ) -> Result<Option<ExtensionPolicy>> {
        let Some(existing) = ExtensionPolicies::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询扩展名策略失败: {e}")))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp().max(existing.updated_at);
        let mut model = existing.into_active_model();
        model.enabled = Set(enabled);
        model.updated_at = Set(now);
        model.updated_by = Set(updated_by);

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新扩展名策略失败: {e}")))?;

        Ok(Some(result.into_policy()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_policies() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let policies = storage.list_extension_policies_impl().await.unwrap();

        let extensions: Vec<&str> = policies.iter().map(|p| p.extension.as_str()).collect();
        assert_eq!(
            extensions,
            vec!["py", "doc", "docx", "ppt", "pptx", "pdf", "xls", "xlsx"]
        );
        let enabled: Vec<&str> = policies
            .iter()
            .filter(|p| p.enabled)
            .map(|p| p.extension.as_str())
            .collect();
        assert_eq!(enabled, vec!["py"]);
    }

    #[tokio::test]
    async fn test_lookup_by_extension_normalizes() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let policy = storage
            .get_extension_policy_by_extension_impl(".PDF")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(policy.mime_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_set_enabled_idempotent() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let pdf = storage
            .get_extension_policy_by_extension_impl("pdf")
            .await
            .unwrap()
            .unwrap();

        let first = storage
            .set_extension_enabled_impl(pdf.id, true, Some(1))
            .await
            .unwrap()
            .unwrap();
        let second = storage
            .set_extension_enabled_impl(pdf.id, true, Some(1))
            .await
            .unwrap()
            .unwrap();

        assert!(first.enabled && second.enabled);
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(first.id, second.id);
        assert_eq!(storage.list_extension_policies_impl().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_set_enabled_unknown_id() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let result = storage.set_extension_enabled_impl(999, true, None).await.unwrap();
        assert!(result.is_none());
    }
}
