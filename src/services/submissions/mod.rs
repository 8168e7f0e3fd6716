pub mod preview;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use crate::errors::PortalError;
use crate::models::submissions::requests::SubmissionListQuery;
use crate::models::{ApiResponse, ErrorCode};

pub use preview::{build_preview, download_url, load_content};

pub struct SubmissionService;

// 文件缺失时返回的警告
fn file_missing(err: &PortalError) -> HttpResponse {
    tracing::warn!("{}", err);
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::FileNotFound,
        "The submitted file could not be found in storage",
    ))
}

fn submission_not_found(id: i64) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SubmissionNotFound,
        format!("Submission {id} not found"),
    ))
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self
    }

    /// 提交列表（合并评分）
    pub async fn list(&self, request: &HttpRequest, query: SubmissionListQuery) -> ActixResult<HttpResponse> {
        let storage = super::storage_from(request)?;
        match storage.list_submissions_with_pagination(query).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Submissions retrieved",
            ))),
            Err(e) => Ok(ApiResponse::from_error(&e)),
        }
    }

    pub async fn preview(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = super::storage_from(request)?;
        let blobs = super::blob_store_from(request)?;

        let submission = match storage.get_submission_by_id(id).await {
            Ok(Some(s)) => s,
            Ok(None) => return Ok(submission_not_found(id)),
            Err(e) => return Ok(ApiResponse::from_error(&e)),
        };

        match build_preview(&blobs, &submission).await {
            Ok(preview) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                preview,
                "Preview generated",
            ))),
            Err(e @ PortalError::NotFound(_)) => Ok(file_missing(&e)),
            Err(e) => Ok(ApiResponse::from_error(&e)),
        }
    }

    pub async fn download(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = super::storage_from(request)?;
        let blobs = super::blob_store_from(request)?;

        let submission = match storage.get_submission_by_id(id).await {
            Ok(Some(s)) => s,
            Ok(None) => return Ok(submission_not_found(id)),
            Err(e) => return Ok(ApiResponse::from_error(&e)),
        };

        let bytes = match load_content(&blobs, &submission).await {
            Ok(bytes) => bytes,
            Err(e @ PortalError::NotFound(_)) => return Ok(file_missing(&e)),
            Err(e) => return Ok(ApiResponse::from_error(&e)),
        };

        Ok(HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, submission.mime_type.as_str()))
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"{}\"",
                    submission.file_name.replace('"', "")
                ),
            ))
            .body(bytes))
    }
}
