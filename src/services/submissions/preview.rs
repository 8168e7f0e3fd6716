//! 提交预览与下载

use std::sync::Arc;

use crate::errors::{PortalError, Result};
use crate::models::submissions::entities::Submission;
use crate::models::submissions::responses::SubmissionPreview;
use crate::storage::BlobStore;
use crate::utils::{format_file_size, is_text_extension};

pub fn download_url(submission_id: i64) -> String {
    format!("/api/v1/submissions/{submission_id}/download")
}

/// 读取文件内容，文件缺失时返回 `NotFound`
pub async fn load_content(blobs: &Arc<dyn BlobStore>, submission: &Submission) -> Result<Vec<u8>> {
    blobs.get(&submission.storage_key).await.map_err(|e| match e {
        PortalError::NotFound(_) => PortalError::not_found(format!(
            "The file for submission {} is missing from storage",
            submission.id
        )),
        other => other,
    })
}

/// 纯文本格式返回内容，其余格式返回元数据和下载地址
pub async fn build_preview(blobs: &Arc<dyn BlobStore>, submission: &Submission) -> Result<SubmissionPreview> {
    if is_text_extension(&submission.extension) {
        let bytes = load_content(blobs, submission).await?;
        return Ok(SubmissionPreview::Text {
            file_name: submission.file_name.clone(),
            content: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    Ok(SubmissionPreview::Binary {
        file_name: submission.file_name.clone(),
        mime_type: submission.mime_type.clone(),
        file_size_display: format_file_size(submission.file_size.max(0) as u64),
        download_url: download_url(submission.id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalBlobStore;

    fn submission(extension: &str, key: &str) -> Submission {
        Submission {
            id: 3,
            student_name: "Asha".to_string(),
            class_name: "10th".to_string(),
            section: "A".to_string(),
            file_name: format!("hw1.{extension}"),
            extension: extension.to_string(),
            storage_key: key.to_string(),
            file_size: 2048,
            mime_type: "application/pdf".to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    fn blobs() -> (Arc<dyn BlobStore>, std::path::PathBuf) {
        let root = std::env::temp_dir().join(format!("portal-preview-{}", uuid::Uuid::new_v4()));
        (Arc::new(LocalBlobStore::new(&root)), root)
    }

    #[tokio::test]
    async fn test_text_preview() {
        let (blobs, root) = blobs();
        blobs.put("10th/A/k-hw1.py", b"print('hi')").await.unwrap();

        let preview = build_preview(&blobs, &submission("py", "10th/A/k-hw1.py"))
            .await
            .unwrap();
        match preview {
            SubmissionPreview::Text { content, .. } => assert_eq!(content, "print('hi')"),
            other => panic!("unexpected preview: {other:?}"),
        }
        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_binary_preview_is_metadata_only() {
        let (blobs, _) = blobs();
        let preview = build_preview(&blobs, &submission("pdf", "10th/A/missing.pdf"))
            .await
            .unwrap();
        match preview {
            SubmissionPreview::Binary { download_url, file_size_display, .. } => {
                assert_eq!(download_url, "/api/v1/submissions/3/download");
                assert_eq!(file_size_display, "2 KB");
            }
            other => panic!("unexpected preview: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_text_file_is_not_found() {
        let (blobs, _) = blobs();
        let err = build_preview(&blobs, &submission("py", "10th/A/gone.py"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::NotFound(_)));
    }
}
