/*!
 * 提交实时推送
 *
 * 客户端通过以下 URL 连接：
 * ```text
 * ws://host/api/v1/feed/ws?token=<access_token>
 * ```
 *
 * 连接建立后服务端先订阅变更，再加载最近的提交，把加载期间收到的事件合并进去，
 * 然后发送一条 `snapshot`，之后每有新提交就推送一条 `submission_created`：
 *
 * ```json
 * {"type": "snapshot", "data": [ ... ]}
 * {"type": "submission_created", "data": { "id": 42, "student_name": "Asha", ... }}
 * ```
 *
 * 心跳：服务端每 30 秒发送 ping；客户端也可以发送文本 `{"type":"ping"}`，收到 `{"type":"pong"}`。
 */

pub mod connections;
pub mod hub;
pub mod merge;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use actix_ws::Message;
use futures_util::StreamExt;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::middlewares::RequireJWT;
use crate::models::admins::entities::AdminSession;
use crate::models::common::pagination::DEFAULT_PAGE_SIZE;
use crate::models::submissions::{entities::Submission, responses::FeedMessage};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub use connections::FeedConnections;
pub use hub::{ChangeEvent, ChangeFeed, EventKind, FeedTable, Subscription};
pub use merge::merge_incoming;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// 客户端发来的控制消息
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Ping,
}

/// 首屏数据及其后续事件流
pub struct InitialSnapshot {
    pub records: Vec<Submission>,
    pub subscription: Subscription,
    pub rx: mpsc::UnboundedReceiver<Submission>,
    sent_ids: HashSet<i64>,
}

impl InitialSnapshot {
    /// 过滤已随首屏发送过的记录，每个 id 只拦截一次
    pub fn take_unsent(&mut self, record: Submission) -> Option<Submission> {
        if self.sent_ids.remove(&record.id) {
            None
        } else {
            Some(record)
        }
    }
}

pub struct FeedService;

impl FeedService {
    pub fn new_lazy() -> Self {
        Self
    }

    /// 升级为 WebSocket 并开始推送
    pub async fn connect(
        &self,
        request: &HttpRequest,
        body: web::Payload,
    ) -> ActixResult<HttpResponse> {
        let Some(admin) = RequireJWT::extract_session(request) else {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Admin session required",
            )));
        };
        let storage = super::storage_from(request)?;

        let (response, session, stream) = actix_ws::handle(request, body)?;
        actix_web::rt::spawn(Self::handle_connection(admin, storage, session, stream));
        Ok(response)
    }

    /// 订阅、加载首屏并合并加载期间的事件
    pub async fn initial_snapshot(
        feed: &ChangeFeed,
        storage: &Arc<dyn Storage>,
    ) -> crate::errors::Result<InitialSnapshot> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscription = feed.subscribe(FeedTable::Submissions, EventKind::Insert, move |event| {
            let _ = tx.send(event.record);
        });

        let loaded = storage
            .list_recent_submissions(DEFAULT_PAGE_SIZE as u64)
            .await?;

        let mut during_load = Vec::new();
        while let Ok(record) = rx.try_recv() {
            during_load.push(record);
        }
        let records = merge_incoming(loaded, during_load, |s| s.id);
        let sent_ids = records.iter().map(|s| s.id).collect();

        Ok(InitialSnapshot {
            records,
            subscription,
            rx,
            sent_ids,
        })
    }

    async fn handle_connection(
        admin: AdminSession,
        storage: Arc<dyn Storage>,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) {
        let open = FeedConnections::get().register(admin.admin_id);
        info!(
            "Feed connected for admin: {} ({} open)",
            admin.admin_id, open
        );

        let mut snapshot = match Self::initial_snapshot(ChangeFeed::get(), &storage).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Failed to load feed snapshot: {}", e);
                let _ = session.close(None).await;
                FeedConnections::get().unregister(admin.admin_id);
                return;
            }
        };

        let records = std::mem::take(&mut snapshot.records);
        if !send_message(&mut session, &FeedMessage::Snapshot(records)).await {
            snapshot.subscription.cancel();
            FeedConnections::get().unregister(admin.admin_id);
            return;
        }

        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;

        loop {
            tokio::select! {
                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Ok(ClientMessage::Ping) = serde_json::from_str::<ClientMessage>(&text)
                                && session.text(r#"{"type":"pong"}"#).await.is_err()
                            {
                                break;
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if session.pong(&data).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(e)) => {
                            warn!("Feed socket error for admin {}: {:?}", admin.admin_id, e);
                            break;
                        }
                        _ => {}
                    }
                }

                record = snapshot.rx.recv() => {
                    match record {
                        Some(record) => {
                            let Some(record) = snapshot.take_unsent(record) else {
                                continue;
                            };
                            if !send_message(&mut session, &FeedMessage::SubmissionCreated(record)).await {
                                break;
                            }
                        }
                        None => break,
                    }
                }

                _ = heartbeat.tick() => {
                    if session.ping(b"").await.is_err() {
                        break;
                    }
                }
            }
        }

        snapshot.subscription.cancel();
        FeedConnections::get().unregister(admin.admin_id);
        debug!("Feed subscription cancelled for admin: {}", admin.admin_id);
        info!("Feed disconnected for admin: {}", admin.admin_id);
    }
}

async fn send_message(session: &mut actix_ws::Session, message: &FeedMessage) -> bool {
    match serde_json::to_string(message) {
        Ok(json) => session.text(json).await.is_ok(),
        Err(e) => {
            warn!("Failed to serialize feed message: {}", e);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, sample_submission};

    #[tokio::test]
    async fn test_snapshot_then_live_events() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let first = storage
            .create_submission(sample_submission("Asha", "10th", "A", "hw1.py"))
            .await
            .unwrap();

        let feed = ChangeFeed::new();
        let mut snapshot = FeedService::initial_snapshot(&feed, &storage).await.unwrap();
        assert_eq!(
            snapshot.records.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![first.id]
        );

        let second = storage
            .create_submission(sample_submission("Ravi", "10th", "B", "hw1.py"))
            .await
            .unwrap();
        feed.publish(ChangeEvent::submission_created(second.clone()));

        let received = tokio::time::timeout(Duration::from_secs(1), snapshot.rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.take_unsent(received).map(|s| s.id), Some(second.id));

        snapshot.subscription.cancel();
    }

    #[tokio::test]
    async fn test_snapshot_records_are_not_streamed_again() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let first = storage
            .create_submission(sample_submission("Asha", "10th", "A", "hw1.py"))
            .await
            .unwrap();

        let feed = ChangeFeed::new();
        let mut snapshot = FeedService::initial_snapshot(&feed, &storage).await.unwrap();
        assert_eq!(snapshot.records.len(), 1);

        // 已写入但晚于首屏才发布的事件
        feed.publish(ChangeEvent::submission_created(first.clone()));
        let late = tokio::time::timeout(Duration::from_secs(1), snapshot.rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(snapshot.take_unsent(late).is_none());

        let second = storage
            .create_submission(sample_submission("Ravi", "10th", "B", "hw1.py"))
            .await
            .unwrap();
        feed.publish(ChangeEvent::submission_created(second.clone()));
        let fresh = tokio::time::timeout(Duration::from_secs(1), snapshot.rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.take_unsent(fresh).map(|s| s.id), Some(second.id));

        // 同一 id 只拦截一次
        assert!(snapshot.take_unsent(first.clone()).is_some());

        snapshot.subscription.cancel();
    }

    #[test]
    fn test_feed_message_shape() {
        let json = serde_json::to_value(FeedMessage::Snapshot(vec![])).unwrap();
        assert_eq!(json["type"], "snapshot");
        assert!(json["data"].as_array().unwrap().is_empty());

        let ping: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(ping, ClientMessage::Ping));
    }
}
