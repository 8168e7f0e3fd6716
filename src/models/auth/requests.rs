use serde::Deserialize;
use ts_rs::TS;

// 管理员登录请求
#[derive(Debug, Deserialize, TS)]
pub struct LoginRequest {
    /// 邮箱
    pub email: String,
    /// 密码
    pub password: String,
}
