//! 对象缓存
//!
//! 后端以插件形式注册（`declare_object_cache_plugin!`），启动时按 `cache.type` 选择，
//! 找不到或初始化失败时回退到内存缓存。

pub mod object_cache;
pub mod register;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use register::get_object_cache_plugin;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，无法判断键是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为秒，0 表示使用默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

impl dyn ObjectCache {
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> CacheResult<T> {
        match self.get_raw(key).await {
            CacheResult::Found(json) => match serde_json::from_str(&json) {
                Ok(value) => CacheResult::Found(value),
                Err(e) => {
                    warn!("缓存值反序列化失败，已移除 {}: {}", key, e);
                    self.remove(key).await;
                    CacheResult::NotFound
                }
            },
            CacheResult::NotFound => CacheResult::NotFound,
            CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
        }
    }

    pub async fn insert_json<T: Serialize>(&self, key: String, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(json) => self.insert_raw(key, json, ttl).await,
            Err(e) => warn!("缓存值序列化失败 {}: {}", key, e),
        }
    }
}

/// 注册缓存插件
///
/// 插件类型需提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        <$ty>::new()
                            .map(|cache| Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                            .map_err($crate::errors::PortalError::cache_connection)
                    })
                }),
            );
        }
    };
}

async fn build_plugin(name: &str) -> Option<Result<Box<dyn ObjectCache>>> {
    let constructor = get_object_cache_plugin(name)?;
    Some(constructor().await)
}

/// 按配置创建缓存实例
pub async fn create_object_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;

    match build_plugin(cache_type).await {
        Some(Ok(cache)) => {
            warn!("Cache backend '{}' initialized", cache_type);
            return Ok(Arc::from(cache));
        }
        Some(Err(e)) => warn!("Failed to create {} cache: {}", cache_type, e),
        None => warn!("Cache backend '{}' not found in registry", cache_type),
    }

    if cache_type != "moka" {
        warn!("Falling back to in-memory (moka) cache");
        if let Some(Ok(cache)) = build_plugin("moka").await {
            return Ok(Arc::from(cache));
        }
    }

    Err(PortalError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}
