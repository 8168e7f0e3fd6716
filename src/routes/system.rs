use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::SystemService;

static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

// 提交表单的上传约束（公开）
pub async fn get_upload_policy(req: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.get_upload_policy(&req).await
}

pub async fn get_system_info() -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.get_info().await
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/system")
            .route("/upload-policy", web::get().to(get_upload_policy))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/info", web::get().to(get_system_info)),
            ),
    );
}
