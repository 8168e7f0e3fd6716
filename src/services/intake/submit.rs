//! 提交落库流程
//!
//! 校验 → 魔术字节 → 查重 → 写文件 → 写记录 → 推送变更。
//! 记录写入失败时删除已写入的文件。

use std::sync::Arc;

use tracing::{info, warn};

use super::duplicate::DuplicateDetector;
use super::validator::{FIELD_FILE, FieldErrors, IntakeCandidate, IntakePolicy, file_extension, validate_candidate};
use crate::errors::PortalError;
use crate::models::submissions::entities::{NewSubmission, Submission, SubmissionTuple};
use crate::services::feed::{ChangeEvent, ChangeFeed};
use crate::storage::{BlobStore, Storage};
use crate::utils::{default_mime_type, validate_magic_bytes};

/// 提交被拒绝的原因
#[derive(Debug)]
pub enum IntakeError {
    /// 字段校验失败，逐字段返回
    Fields(FieldErrors),
    Portal(PortalError),
}

impl From<PortalError> for IntakeError {
    fn from(err: PortalError) -> Self {
        IntakeError::Portal(err)
    }
}

/// 上传依赖的组件
pub struct Intake<'a> {
    pub storage: &'a Arc<dyn Storage>,
    pub blobs: &'a Arc<dyn BlobStore>,
    pub feed: &'a ChangeFeed,
}

/// 文件名中只保留字母、数字和 `._-`，其余替换为下划线
pub fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn storage_key(class_name: &str, section: &str, file_name: &str) -> String {
    format!(
        "{}/{}/{}-{}",
        sanitize_file_name(class_name),
        sanitize_file_name(section),
        uuid::Uuid::new_v4(),
        sanitize_file_name(file_name)
    )
}

impl Intake<'_> {
    pub async fn accept(
        &self,
        policy: &IntakePolicy,
        candidate: IntakeCandidate,
        bytes: Vec<u8>,
    ) -> Result<Submission, IntakeError> {
        validate_candidate(policy, &candidate).map_err(IntakeError::Fields)?;

        let file_name = candidate.file_name.unwrap_or_default().trim().to_string();
        let extension = file_extension(&file_name).unwrap_or_default();

        if !validate_magic_bytes(&bytes, &extension) {
            let mut errors = FieldErrors::new();
            errors.insert(
                FIELD_FILE.to_string(),
                "File content does not match its extension".to_string(),
            );
            return Err(IntakeError::Fields(errors));
        }

        let tuple = SubmissionTuple {
            student_name: candidate.student_name.trim().to_string(),
            class_name: candidate.class_name.trim().to_string(),
            section: candidate.section.trim().to_string(),
            file_name,
        };

        DuplicateDetector::new(self.storage.clone())
            .ensure_unique(&tuple)
            .await?;

        let mime_type = match self.storage.get_extension_policy_by_extension(&extension).await {
            Ok(Some(policy)) => policy.mime_type,
            Ok(None) => default_mime_type(&extension).to_string(),
            Err(e) => {
                warn!("Failed to load extension policy for {}: {}", extension, e);
                default_mime_type(&extension).to_string()
            }
        };

        let key = storage_key(&tuple.class_name, &tuple.section, &tuple.file_name);
        self.blobs.put(&key, &bytes).await?;

        let record = NewSubmission {
            student_name: tuple.student_name,
            class_name: tuple.class_name,
            section: tuple.section,
            file_name: tuple.file_name,
            extension,
            storage_key: key.clone(),
            file_size: bytes.len() as i64,
            mime_type,
        };

        let submission = match self.storage.create_submission(record).await {
            Ok(submission) => submission,
            Err(e) => {
                if let Err(cleanup) = self.blobs.delete(&key).await {
                    warn!("Failed to remove orphaned file {}: {}", key, cleanup);
                }
                return Err(e.into());
            }
        };

        info!(
            "Submission {} accepted: {} ({}/{}) {}",
            submission.id,
            submission.student_name,
            submission.class_name,
            submission.section,
            submission.file_name
        );
        self.feed
            .publish(ChangeEvent::submission_created(submission.clone()));

        Ok(submission)
    }
}
