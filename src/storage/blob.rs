//! 文件内容存储
//!
//! 以键寻址的字节存储，键形如 `{class}/{section}/{uuid}-{file_name}`。

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::{PortalError, Result};

#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;
    async fn get(&self, key: &str) -> Result<Vec<u8>>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// 本地文件系统实现，根目录取自 `upload.dir`
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config() -> Self {
        Self::new(&AppConfig::get().upload.dir)
    }

    // 键只允许普通路径段，拒绝绝对路径和 `..`
    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(PortalError::validation(format!("非法的存储键: {key}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                PortalError::file_operation(format!("创建目录 {} 失败: {e}", parent.display()))
            })?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PortalError::file_operation(format!("写入文件 {key} 失败: {e}")))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.resolve(key)?;
        Ok(tokio::fs::read(&path).await?)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortalError::file_operation(format!(
                "删除文件 {key} 失败: {e}"
            ))),
        }
    }
}

pub fn create_blob_store() -> Arc<dyn BlobStore> {
    Arc::new(LocalBlobStore::from_config())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("portal-blob-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let root = temp_root();
        let store = LocalBlobStore::new(&root);

        store.put("10th/A/x-hw1.py", b"print(1)").await.unwrap();
        assert_eq!(store.get("10th/A/x-hw1.py").await.unwrap(), b"print(1)");

        store.delete("10th/A/x-hw1.py").await.unwrap();
        let err = store.get("10th/A/x-hw1.py").await.unwrap_err();
        assert!(matches!(err, PortalError::NotFound(_)));

        // 重复删除不报错
        store.delete("10th/A/x-hw1.py").await.unwrap();

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let store = LocalBlobStore::new(temp_root());
        assert!(store.put("../outside.py", b"x").await.is_err());
        assert!(store.put("/etc/passwd", b"x").await.is_err());
        assert!(store.get("").await.is_err());
    }
}
