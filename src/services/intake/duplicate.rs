//! 提交查重
//!
//! 预检查是尽力而为的，存储层的唯一索引才是最终依据。

use std::sync::Arc;

use tracing::error;

use crate::errors::{PortalError, Result};
use crate::models::submissions::entities::{DUPLICATE_SUBMISSION_MESSAGE, SubmissionTuple};
use crate::storage::Storage;

pub struct DuplicateDetector {
    storage: Arc<dyn Storage>,
}

impl DuplicateDetector {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 四元组是否已有记录；查询失败返回 `DuplicateCheck`，不会当作重复处理
    pub async fn exists(&self, tuple: &SubmissionTuple) -> Result<bool> {
        self.storage.submission_exists(tuple).await.map_err(|e| {
            error!("Duplicate check failed for {:?}: {}", tuple, e);
            PortalError::duplicate_check("Validation failed, please try again")
        })
    }

    /// 已存在时返回带固定提示的 Conflict
    pub async fn ensure_unique(&self, tuple: &SubmissionTuple) -> Result<()> {
        if self.exists(tuple).await? {
            return Err(PortalError::conflict(DUPLICATE_SUBMISSION_MESSAGE));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, sample_submission};

    #[tokio::test]
    async fn test_detects_existing_tuple() {
        let storage = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let created = storage
            .create_submission(sample_submission("Asha", "10th", "A", "hw1.py"))
            .await
            .unwrap();
        let detector = DuplicateDetector::new(storage);

        assert!(detector.exists(&created.tuple()).await.unwrap());
        let err = detector.ensure_unique(&created.tuple()).await.unwrap_err();
        assert_eq!(err, PortalError::conflict(DUPLICATE_SUBMISSION_MESSAGE));

        let mut other = created.tuple();
        other.student_name = "Ravi".to_string();
        assert!(detector.ensure_unique(&other).await.is_ok());
    }

    #[tokio::test]
    async fn test_query_failure_is_not_a_duplicate() {
        use sea_orm::ConnectionTrait;

        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .db
            .execute_unprepared("DROP TABLE marks; DROP TABLE submissions;")
            .await
            .unwrap();
        let detector = DuplicateDetector::new(Arc::new(storage));

        let tuple = SubmissionTuple {
            student_name: "Asha".to_string(),
            class_name: "10th".to_string(),
            section: "A".to_string(),
            file_name: "hw1.py".to_string(),
        };
        let err = detector.ensure_unique(&tuple).await.unwrap_err();
        assert!(matches!(err, PortalError::DuplicateCheck(_)));
    }
}
