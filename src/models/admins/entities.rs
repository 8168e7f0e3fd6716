use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 管理员账号
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Admin {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 当前请求的管理员会话快照
///
/// 由 JWT 中间件生成并放入请求扩展，处理函数取出后显式传入各组件，
/// 组件内部不读取任何全局会话状态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct AdminSession {
    pub admin_id: i64,
    pub email: String,
    pub display_name: Option<String>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl AdminSession {
    pub fn new(admin: &Admin, expires_at: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            admin_id: admin.id,
            email: admin.email.clone(),
            display_name: admin.display_name.clone(),
            expires_at,
        }
    }
}
