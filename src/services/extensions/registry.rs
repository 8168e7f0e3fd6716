//! 扩展名策略表

use std::sync::Arc;

use tracing::info;

use crate::errors::{PortalError, Result};
use crate::models::admins::entities::AdminSession;
use crate::models::extensions::entities::ExtensionPolicy;
use crate::storage::Storage;

pub struct ExtensionRegistry {
    storage: Arc<dyn Storage>,
}

impl ExtensionRegistry {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 按种子顺序列出
    pub async fn list(&self) -> Result<Vec<ExtensionPolicy>> {
        self.storage.list_extension_policies().await
    }

    /// 设置启用状态。幂等，每次调用都会刷新更新时间
    pub async fn set_enabled(
        &self,
        session: &AdminSession,
        id: i64,
        enabled: bool,
    ) -> Result<ExtensionPolicy> {
        let policy = self
            .storage
            .set_extension_enabled(id, enabled, Some(session.admin_id))
            .await?
            .ok_or_else(|| PortalError::not_found(format!("Extension policy {id} not found")))?;

        info!(
            "Admin {} set extension .{} enabled={}",
            session.admin_id, policy.extension, policy.enabled
        );
        Ok(policy)
    }

    /// 已启用的扩展名（小写、无点号）
    pub async fn enabled_extensions(&self) -> Result<Vec<String>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|p| p.enabled)
            .map(|p| p.extension)
            .collect())
    }
}
