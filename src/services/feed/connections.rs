//! 在线推送连接计数

use dashmap::DashMap;
use once_cell::sync::Lazy;

static FEED_CONNECTIONS: Lazy<FeedConnections> = Lazy::new(FeedConnections::new);

/// 管理员 ID -> 打开的推送连接数
pub struct FeedConnections {
    connections: DashMap<i64, usize>,
}

impl Default for FeedConnections {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedConnections {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// 获取全局实例
    pub fn get() -> &'static Self {
        &FEED_CONNECTIONS
    }

    /// 登记连接，返回该管理员当前的连接数
    pub fn register(&self, admin_id: i64) -> usize {
        let mut entry = self.connections.entry(admin_id).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 注销连接，计数归零时移除
    pub fn unregister(&self, admin_id: i64) {
        self.connections.remove_if_mut(&admin_id, |_, count| {
            *count = count.saturating_sub(1);
            *count == 0
        });
    }

    /// 在线管理员数
    pub fn online_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_online(&self, admin_id: i64) -> bool {
        self.connections.contains_key(&admin_id)
    }
}
