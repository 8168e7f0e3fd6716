use crate::cache::{ObjectCache, create_object_cache};
use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use crate::storage::blob::create_blob_store;
use crate::storage::{BlobStore, Storage};
use crate::utils::password::{generate_random_password, hash_password};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub blobs: Arc<dyn BlobStore>,
}

/// 初始化默认管理员账号
/// 管理员表为空时创建，密码取自 `ADMIN_PASSWORD`，未设置则随机生成
async fn seed_admin(storage: &Arc<dyn Storage>, password: Option<String>) -> Result<bool> {
    let count = storage.count_admins().await?;
    if count > 0 {
        debug!("Database already has {} admin(s), skipping admin seed", count);
        return Ok(false);
    }
    info!("No admins found in database, creating default admin account...");

    let password = password.unwrap_or_else(|| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });
    let password_hash = hash_password(&password)?;

    let seed = &AppConfig::get().admin;
    let admin = storage
        .create_admin(&seed.email, &password_hash, Some(seed.display_name.clone()))
        .await?;
    info!(
        "Default admin account created successfully (ID: {}, email: {})",
        admin.id, admin.email
    );
    Ok(true)
}

/// 准备服务器启动的上下文
/// 包括存储、文件存储和缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    once_cell::sync::Lazy::force(&crate::services::system::STARTED_AT);

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    // 初始化默认管理员账号（如果需要）
    if let Err(e) = seed_admin(&storage, std::env::var("ADMIN_PASSWORD").ok()).await {
        warn!("Failed to seed admin account: {}", e);
    }

    let blobs = create_blob_store();
    warn!("File storage rooted at {}", AppConfig::get().upload.dir);

    let cache = create_object_cache()
        .await
        .map_err(|e| PortalError::cache_plugin_not_found(format!("Failed to create cache: {e}")))?;
    warn!("Cache backend initialized");

    Ok(StartupContext {
        storage,
        cache,
        blobs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::utils::password::verify_password;

    #[tokio::test]
    async fn test_seed_admin_only_once() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());

        assert!(seed_admin(&storage, Some("first-password".to_string())).await.unwrap());
        assert!(!seed_admin(&storage, Some("second-password".to_string())).await.unwrap());
        assert_eq!(storage.count_admins().await.unwrap(), 1);

        let admin = storage
            .get_admin_by_email(&AppConfig::get().admin.email)
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password("first-password", &admin.password_hash));
    }
}
