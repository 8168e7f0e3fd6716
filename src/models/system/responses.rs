use serde::Serialize;
use ts_rs::TS;

/// 提交表单所需的上传约束
#[derive(Debug, Serialize, TS)]
pub struct UploadPolicyResponse {
    /// 允许的扩展名（小写，无点号）
    pub accepted_extensions: Vec<String>,
    /// 对应的 MIME 类型，用于表单 accept 属性
    pub accepted_mime_types: Vec<String>,
    pub max_size: usize,
    /// 人类可读的大小上限，如 "5 MB"
    pub max_size_display: String,
    pub classes: Vec<String>,
    pub sections: Vec<String>,
}

#[derive(Debug, Serialize, TS)]
pub struct SystemInfoResponse {
    pub system_name: String,
    pub version: String,
    pub environment: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// 当前打开实时推送的管理员数
    pub online_admins: usize,
}
