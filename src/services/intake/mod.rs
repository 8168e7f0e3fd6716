pub mod duplicate;
pub mod submit;
pub mod validator;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::submissions::responses::SubmissionReceipt;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::extensions::ExtensionRegistry;
use crate::services::feed::ChangeFeed;
use crate::storage::Storage;

pub use duplicate::DuplicateDetector;
pub use submit::{Intake, IntakeError};
pub use validator::{FieldErrors, IntakeCandidate, IntakePolicy, validate_candidate};

// 文本字段的最大长度
const MAX_TEXT_FIELD_BYTES: usize = 1024;

/// 当前生效的上传约束
///
/// `upload.enforce_registry` 为 true 时使用策略表中启用的扩展名，否则使用配置中的固定扩展名。
pub async fn current_policy(storage: &Arc<dyn Storage>) -> Result<IntakePolicy> {
    if AppConfig::get().upload.enforce_registry {
        let extensions = ExtensionRegistry::new(storage.clone())
            .enabled_extensions()
            .await?;
        Ok(IntakePolicy::with_extensions(extensions))
    } else {
        Ok(IntakePolicy::from_config())
    }
}

// 解析后的表单
struct SubmissionForm {
    candidate: IntakeCandidate,
    bytes: Vec<u8>,
}

enum FormError {
    MultipleFiles,
    Malformed(String),
}

pub struct IntakeService;

impl IntakeService {
    pub fn new_lazy() -> Self {
        Self
    }

    /// 接收提交表单
    pub async fn submit(&self, request: &HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
        let storage = super::storage_from(request)?;
        let blobs = super::blob_store_from(request)?;

        let policy = match current_policy(&storage).await {
            Ok(policy) => policy,
            Err(e) => return Ok(ApiResponse::from_error(&e)),
        };

        let form = match read_form(payload, policy.max_size).await {
            Ok(form) => form,
            Err(FormError::MultipleFiles) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::MultifileUploadNotAllowed,
                    "Only one file can be uploaded at a time",
                )));
            }
            Err(FormError::Malformed(reason)) => {
                tracing::warn!("Malformed submission form: {}", reason);
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "Malformed submission form",
                )));
            }
        };

        let intake = Intake {
            storage: &storage,
            blobs: &blobs,
            feed: ChangeFeed::get(),
        };

        match intake.accept(&policy, form.candidate, form.bytes).await {
            Ok(submission) => Ok(HttpResponse::Created().json(ApiResponse::success(
                SubmissionReceipt::from(&submission),
                "Assignment submitted successfully",
            ))),
            Err(IntakeError::Fields(errors)) => Ok(HttpResponse::BadRequest().json(
                ApiResponse::error(
                    ErrorCode::ValidationFailed,
                    errors,
                    "Please correct the highlighted fields",
                ),
            )),
            Err(IntakeError::Portal(e)) => Ok(ApiResponse::from_error(&e)),
        }
    }
}

async fn read_text(field: &mut actix_multipart::Field) -> std::result::Result<String, FormError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| FormError::Malformed(e.to_string()))?;
        if buf.len() + data.len() > MAX_TEXT_FIELD_BYTES {
            return Err(FormError::Malformed("text field too long".to_string()));
        }
        buf.extend_from_slice(&data);
    }
    String::from_utf8(buf).map_err(|_| FormError::Malformed("text field is not UTF-8".to_string()))
}

// 文件内容最多缓存 max_size + 1 字节，超出部分只计数
async fn read_form(mut payload: Multipart, max_size: u64) -> std::result::Result<SubmissionForm, FormError> {
    let mut candidate = IntakeCandidate::default();
    let mut bytes = Vec::new();
    let mut file_seen = false;
    let keep_limit = max_size.saturating_add(1) as usize;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| FormError::Malformed(e.to_string()))?
    {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        let file_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());

        match name.as_str() {
            validator::FIELD_STUDENT_NAME => candidate.student_name = read_text(&mut field).await?,
            validator::FIELD_CLASS_NAME => candidate.class_name = read_text(&mut field).await?,
            validator::FIELD_SECTION => candidate.section = read_text(&mut field).await?,
            validator::FIELD_FILE => {
                if file_seen {
                    return Err(FormError::MultipleFiles);
                }
                file_seen = true;
                candidate.file_name = file_name.filter(|n| !n.trim().is_empty());

                let mut total: u64 = 0;
                while let Some(chunk) = field.next().await {
                    let data = chunk.map_err(|e| FormError::Malformed(e.to_string()))?;
                    total += data.len() as u64;
                    if bytes.len() < keep_limit {
                        let room = keep_limit - bytes.len();
                        bytes.extend_from_slice(&data[..data.len().min(room)]);
                    }
                }
                candidate.file_size = total;
            }
            _ => {
                // 未知字段直接丢弃
                while let Some(chunk) = field.next().await {
                    chunk.map_err(|e| FormError::Malformed(e.to_string()))?;
                }
            }
        }
    }

    Ok(SubmissionForm { candidate, bytes })
}

