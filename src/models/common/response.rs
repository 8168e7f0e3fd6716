use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::PortalError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 将内部错误转换为 HTTP 响应
    ///
    /// 存储故障只向用户返回“稍后重试”，详细信息写入日志。
    pub fn from_error(err: &PortalError) -> HttpResponse {
        let status = match err {
            PortalError::Validation(_) | PortalError::NothingToExport(_) => {
                StatusCode::BAD_REQUEST
            }
            PortalError::Conflict(_) => StatusCode::CONFLICT,
            PortalError::DuplicateCheck(_) => StatusCode::SERVICE_UNAVAILABLE,
            PortalError::NotFound(_) => StatusCode::NOT_FOUND,
            PortalError::Authentication(_) => StatusCode::UNAUTHORIZED,
            PortalError::Authorization(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if err.is_store_failure() {
            tracing::error!("{}", err);
            "The service is temporarily unavailable, please try again later".to_string()
        } else {
            err.message().to_string()
        };

        HttpResponse::build(status)
            .json(ApiResponse::error_empty(ErrorCode::from_error(err), message))
    }
}
