use serde::Serialize;
use ts_rs::TS;

use crate::models::PaginationInfo;
use crate::models::reports::entities::LetterGrade;
use crate::models::submissions::entities::Submission;

/// 上传成功回执
#[derive(Debug, Serialize, TS)]
pub struct SubmissionReceipt {
    pub id: i64,
    pub student_name: String,
    pub file_name: String,
    pub file_size: i64,
    pub file_size_display: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Submission> for SubmissionReceipt {
    fn from(s: &Submission) -> Self {
        Self {
            id: s.id,
            student_name: s.student_name.clone(),
            file_name: s.file_name.clone(),
            file_size: s.file_size,
            file_size_display: crate::utils::format_file_size(s.file_size.max(0) as u64),
            created_at: s.created_at,
        }
    }
}

/// 提交中的评分信息
#[derive(Debug, Clone, Serialize, TS)]
pub struct SubmissionMarkInfo {
    pub score: i32,
    pub grade: LetterGrade,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 提交列表项（已合并评分）
#[derive(Debug, Clone, Serialize, TS)]
pub struct SubmissionListItem {
    #[serde(flatten)]
    pub submission: Submission,
    pub file_size_display: String,
    pub mark: Option<SubmissionMarkInfo>,
}

#[derive(Debug, Serialize, TS)]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionListItem>,
    pub pagination: PaginationInfo,
}

/// 预览内容
#[derive(Debug, Serialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionPreview {
    /// 纯文本格式，直接返回内容
    Text {
        file_name: String,
        content: String,
    },
    /// 二进制格式，只返回元数据和下载地址
    Binary {
        file_name: String,
        mime_type: String,
        file_size_display: String,
        download_url: String,
    },
}

/// 实时推送消息
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum FeedMessage {
    /// 订阅后的首屏数据
    Snapshot(Vec<Submission>),
    /// 新增提交
    SubmissionCreated(Submission),
}
