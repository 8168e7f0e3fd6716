//! 进程内变更订阅
//!
//! 基于 `tokio::sync::broadcast`。每个订阅在独立任务中运行，
//! 取消订阅即中止该任务。

use once_cell::sync::Lazy;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::submissions::entities::Submission;

const CHANNEL_CAPACITY: usize = 256;

/// 全局变更源
static CHANGE_FEED: Lazy<ChangeFeed> = Lazy::new(ChangeFeed::new);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedTable {
    Submissions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Insert,
}

#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub table: FeedTable,
    pub kind: EventKind,
    pub record: Submission,
}

impl ChangeEvent {
    pub fn submission_created(record: Submission) -> Self {
        Self {
            table: FeedTable::Submissions,
            kind: EventKind::Insert,
            record,
        }
    }
}

pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// 获取全局实例
    pub fn get() -> &'static Self {
        &CHANGE_FEED
    }

    /// 发布事件，没有订阅者时什么也不做
    pub fn publish(&self, event: ChangeEvent) {
        if self.sender.send(event).is_err() {
            debug!("No change feed subscribers");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// 订阅指定表和事件类型
    pub fn subscribe<F>(&self, table: FeedTable, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(ChangeEvent) + Send + 'static,
    {
        let mut rx = self.sender.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) if event.table == table && event.kind == kind => handler(event),
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Change feed subscriber lagged by {} events", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Subscription { handle }
    }
}

/// 订阅句柄，取消或丢弃后不再投递事件
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn cancel(self) {
        self.handle.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn submission(id: i64) -> Submission {
        Submission {
            id,
            student_name: "Asha".to_string(),
            class_name: "10th".to_string(),
            section: "A".to_string(),
            file_name: format!("hw{id}.py"),
            extension: "py".to_string(),
            storage_key: format!("10th/A/{id}-hw.py"),
            file_size: 10,
            mime_type: "text/x-python".to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let feed = ChangeFeed::new();
        assert_eq!(feed.subscriber_count(), 0);
        feed.publish(ChangeEvent::submission_created(submission(1)));
    }

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let feed = ChangeFeed::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let subscription = feed.subscribe(FeedTable::Submissions, EventKind::Insert, move |e| {
            sink.lock().unwrap().push(e.record.id);
        });

        feed.publish(ChangeEvent::submission_created(submission(1)));
        feed.publish(ChangeEvent::submission_created(submission(2)));
        settle().await;

        assert_eq!(*received.lock().unwrap(), vec![1, 2]);
        assert!(subscription.is_active());
        subscription.cancel();
    }

    #[tokio::test]
    async fn test_cancelled_subscription_stops_receiving() {
        let feed = ChangeFeed::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let subscription = feed.subscribe(FeedTable::Submissions, EventKind::Insert, move |e| {
            sink.lock().unwrap().push(e.record.id);
        });

        feed.publish(ChangeEvent::submission_created(submission(1)));
        settle().await;
        subscription.cancel();
        settle().await;

        feed.publish(ChangeEvent::submission_created(submission(2)));
        settle().await;

        assert_eq!(*received.lock().unwrap(), vec![1]);
        assert_eq!(feed.subscriber_count(), 0);
    }
}
