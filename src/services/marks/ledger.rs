//! 评分账本
//!
//! 每个提交至多一条评分，重复评分覆盖原值。

use std::sync::Arc;

use tracing::info;

use crate::errors::{PortalError, Result};
use crate::models::admins::entities::AdminSession;
use crate::models::marks::entities::{MAX_SCORE, MIN_SCORE, Mark, MarkFilter};
use crate::storage::Storage;

/// 校验分数为 [0, 100] 内的整数
pub fn validate_score(score: f64) -> Result<i32> {
    let in_range = score.is_finite()
        && score.fract() == 0.0
        && score >= MIN_SCORE as f64
        && score <= MAX_SCORE as f64;
    if !in_range {
        return Err(PortalError::validation(format!(
            "score must be a whole number between {MIN_SCORE} and {MAX_SCORE}"
        )));
    }
    Ok(score as i32)
}

pub struct GradingLedger {
    storage: Arc<dyn Storage>,
}

impl GradingLedger {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn set_mark(&self, session: &AdminSession, submission_id: i64, score: f64) -> Result<Mark> {
        let score = validate_score(score)?;

        let submission = self
            .storage
            .get_submission_by_id(submission_id)
            .await?
            .ok_or_else(|| PortalError::not_found(format!("Submission {submission_id} not found")))?;

        let mark = self
            .storage
            .upsert_mark(&submission, score, Some(session.admin_id))
            .await?;

        info!(
            "Admin {} marked submission {} with {}",
            session.admin_id, submission_id, score
        );
        Ok(mark)
    }

    pub async fn get_mark(&self, submission_id: i64) -> Result<Option<Mark>> {
        self.storage.get_mark_by_submission_id(submission_id).await
    }

    /// 按创建时间倒序
    pub async fn list_marks(&self, filter: MarkFilter) -> Result<Vec<Mark>> {
        self.storage.list_marks(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, sample_submission};

    fn session() -> AdminSession {
        AdminSession {
            admin_id: 7,
            email: "admin@localhost".to_string(),
            display_name: None,
            expires_at: chrono::Utc::now(),
        }
    }

    async fn ledger_with_submission() -> (GradingLedger, i64) {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let submission = storage
            .create_submission(sample_submission("Asha", "10th", "A", "hw1.py"))
            .await
            .unwrap();
        (GradingLedger::new(storage), submission.id)
    }

    #[test]
    fn test_validate_score() {
        assert_eq!(validate_score(0.0).unwrap(), 0);
        assert_eq!(validate_score(100.0).unwrap(), 100);
        assert_eq!(validate_score(85.0).unwrap(), 85);
        for bad in [-1.0, 101.0, 85.5, f64::NAN, f64::INFINITY] {
            let err = validate_score(bad).unwrap_err();
            assert!(matches!(err, PortalError::Validation(_)));
            assert!(err.message().contains("score"));
            assert!(err.message().contains("0 and 100"));
        }
    }

    #[tokio::test]
    async fn test_set_mark_twice_keeps_one() {
        let (ledger, id) = ledger_with_submission().await;

        ledger.set_mark(&session(), id, 85.0).await.unwrap();
        ledger.set_mark(&session(), id, 85.0).await.unwrap();

        let marks = ledger.list_marks(MarkFilter::default()).await.unwrap();
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].score, 85);
        assert_eq!(marks[0].graded_by, Some(7));
    }

    #[tokio::test]
    async fn test_latest_mark_wins() {
        let (ledger, id) = ledger_with_submission().await;

        ledger.set_mark(&session(), id, 72.0).await.unwrap();
        assert_eq!(ledger.get_mark(id).await.unwrap().unwrap().score, 72);

        ledger.set_mark(&session(), id, 90.0).await.unwrap();
        assert_eq!(ledger.get_mark(id).await.unwrap().unwrap().score, 90);
    }

    #[tokio::test]
    async fn test_invalid_score_does_not_write() {
        let (ledger, id) = ledger_with_submission().await;

        assert!(ledger.set_mark(&session(), id, 150.0).await.is_err());
        assert!(ledger.get_mark(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_submission() {
        let (ledger, _) = ledger_with_submission().await;
        let err = ledger.set_mark(&session(), 424242, 50.0).await.unwrap_err();
        assert!(matches!(err, PortalError::NotFound(_)));
    }
}
