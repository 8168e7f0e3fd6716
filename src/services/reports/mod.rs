pub mod aggregator;
pub mod render;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::marks::entities::MarkFilter;
use crate::storage::Storage;

pub use aggregator::generate;
pub use render::{XLSX_CONTENT_TYPE, render_xlsx};

pub struct ReportService;

/// 读取评分、排版并渲染
pub async fn export_marks(storage: &dyn Storage, filter: MarkFilter) -> Result<Vec<u8>> {
    let marks = storage.list_marks(filter).await?;
    let document = generate(&marks, &AppConfig::get().report.title)?;
    info!(
        "Exporting {} marks in {} groups over {} pages",
        marks.len(),
        document.groups.len(),
        document.pages.len()
    );
    render_xlsx(&document)
}

impl ReportService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn export(&self, request: &HttpRequest, filter: MarkFilter) -> ActixResult<HttpResponse> {
        let storage = super::storage_from(request)?;

        match export_marks(storage.as_ref(), filter).await {
            Ok(buffer) => Ok(HttpResponse::Ok()
                .content_type(XLSX_CONTENT_TYPE)
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"{}\"",
                        AppConfig::get().report.file_name
                    ),
                ))
                .body(buffer)),
            Err(e) => {
                if matches!(e, crate::errors::PortalError::Export(_)) {
                    error!("生成报表失败: {}", e);
                }
                Ok(ApiResponse::from_error(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PortalError;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, sample_submission};

    #[tokio::test]
    async fn test_export_requires_marks() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let err = export_marks(&storage, MarkFilter::default()).await.unwrap_err();
        assert!(matches!(err, PortalError::NothingToExport(_)));
    }

    #[tokio::test]
    async fn test_export_marks_to_workbook() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let submission = storage
            .create_submission(sample_submission("Asha", "10th", "A", "hw1.py"))
            .await
            .unwrap();
        storage.upsert_mark(&submission, 91, None).await.unwrap();

        let bytes = export_marks(&storage, MarkFilter::default()).await.unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
