use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::extensions::requests::SetExtensionEnabledRequest;
use crate::services::ExtensionService;

static EXTENSION_SERVICE: Lazy<ExtensionService> = Lazy::new(ExtensionService::new_lazy);

pub async fn list_extensions(req: HttpRequest) -> ActixResult<HttpResponse> {
    EXTENSION_SERVICE.list(&req).await
}

pub async fn set_extension_enabled(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<SetExtensionEnabledRequest>,
) -> ActixResult<HttpResponse> {
    EXTENSION_SERVICE
        .set_enabled(&req, path.into_inner(), body.into_inner())
        .await
}

// 配置路由
pub fn configure_extension_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/extensions")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_extensions))
            .route("/{id}", web::put().to(set_extension_enabled)),
    );
}
