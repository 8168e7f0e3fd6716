use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::system::responses::{SystemInfoResponse, UploadPolicyResponse};
use crate::services::feed::FeedConnections;
use crate::services::intake::current_policy;
use crate::storage::Storage;
use crate::utils::{default_mime_type, format_file_size};

/// 进程启动时间，启动阶段强制初始化
pub static STARTED_AT: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// 提交表单展示的上传约束
pub async fn upload_policy(storage: &Arc<dyn Storage>) -> Result<UploadPolicyResponse> {
    let policy = current_policy(storage).await?;

    let mut accepted_mime_types = Vec::with_capacity(policy.accepted_extensions.len());
    for extension in &policy.accepted_extensions {
        let mime = match storage.get_extension_policy_by_extension(extension).await? {
            Some(p) => p.mime_type,
            None => default_mime_type(extension).to_string(),
        };
        accepted_mime_types.push(mime);
    }

    Ok(UploadPolicyResponse {
        accepted_extensions: policy.accepted_extensions,
        accepted_mime_types,
        max_size: policy.max_size as usize,
        max_size_display: format_file_size(policy.max_size),
        classes: policy.classes,
        sections: policy.sections,
    })
}

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn get_upload_policy(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = super::storage_from(request)?;
        match upload_policy(&storage).await {
            Ok(policy) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                policy,
                "Upload policy retrieved",
            ))),
            Err(e) => Ok(ApiResponse::from_error(&e)),
        }
    }

    pub async fn get_info(&self) -> ActixResult<HttpResponse> {
        let config = AppConfig::get();
        let info = SystemInfoResponse {
            system_name: config.app.system_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: config.app.environment.clone(),
            started_at: *STARTED_AT,
            online_admins: FeedConnections::get().online_count(),
        };
        Ok(HttpResponse::Ok().json(ApiResponse::success(info, "System information retrieved")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[tokio::test]
    async fn test_upload_policy_defaults() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let policy = upload_policy(&storage).await.unwrap();

        assert_eq!(policy.accepted_extensions, vec!["py".to_string()]);
        assert_eq!(policy.accepted_mime_types, vec!["text/x-python".to_string()]);
        assert_eq!(policy.max_size, 5 * 1024 * 1024);
        assert_eq!(policy.max_size_display, "5 MB");
        assert!(policy.classes.contains(&"10th".to_string()));
        assert!(policy.sections.contains(&"A".to_string()));
    }
}
