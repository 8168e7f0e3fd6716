use serde::{Deserialize, Serialize};

use crate::errors::PortalError;

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    RateLimitExceeded = 1005,
    InternalServerError = 1006,
    ServiceUnavailable = 1007,

    // 认证
    AuthFailed = 2000,

    // 提交
    SubmissionNotFound = 3000,
    DuplicateSubmission = 3001,
    DuplicateCheckFailed = 3002,
    FileTypeNotAllowed = 3003,
    FileSizeExceeded = 3004,
    FileNotFound = 3005,
    FileUploadFailed = 3006,
    MultifileUploadNotAllowed = 3007,

    // 评分
    MarkInvalid = 4000,
    MarkNotFound = 4001,

    // 扩展名策略
    ExtensionNotFound = 5000,

    // 报表
    NothingToExport = 6000,
    ExportFailed = 6001,
}

impl ErrorCode {
    /// 根据内部错误推断错误码
    pub fn from_error(err: &PortalError) -> Self {
        match err {
            PortalError::Validation(_) => ErrorCode::ValidationFailed,
            PortalError::Conflict(_) => ErrorCode::DuplicateSubmission,
            PortalError::DuplicateCheck(_) => ErrorCode::DuplicateCheckFailed,
            PortalError::NotFound(_) => ErrorCode::NotFound,
            PortalError::NothingToExport(_) => ErrorCode::NothingToExport,
            PortalError::Export(_) => ErrorCode::ExportFailed,
            PortalError::Authentication(_) => ErrorCode::AuthFailed,
            PortalError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }
}
