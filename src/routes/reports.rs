use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::marks::entities::MarkFilter;
use crate::services::ReportService;

static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

// 导出评分报表
pub async fn export_marks(req: HttpRequest, query: web::Query<MarkFilter>) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.export(&req, query.into_inner()).await
}

// 配置路由
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reports")
            .wrap(middlewares::RequireJWT)
            .route("/marks", web::get().to(export_marks)),
    );
}
