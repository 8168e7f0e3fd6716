use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::FeedService;

static FEED_SERVICE: Lazy<FeedService> = Lazy::new(FeedService::new_lazy);

// WebSocket 握手，令牌通过 `?token=` 传入
pub async fn feed_ws(req: HttpRequest, body: web::Payload) -> ActixResult<HttpResponse> {
    FEED_SERVICE.connect(&req, body).await
}

// 配置路由
pub fn configure_feed_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/feed")
            .wrap(middlewares::RequireJWT)
            .route("/ws", web::get().to(feed_ws)),
    );
}
