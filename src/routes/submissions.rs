use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, guard, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::marks::requests::SetMarkRequest;
use crate::models::submissions::requests::SubmissionListQuery;
use crate::services::{IntakeService, MarkService, SubmissionService};

// 懒加载的全局服务实例
static INTAKE_SERVICE: Lazy<IntakeService> = Lazy::new(IntakeService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);
static MARK_SERVICE: Lazy<MarkService> = Lazy::new(MarkService::new_lazy);

// 提交作业（公开）
pub async fn create_submission(
    req: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    INTAKE_SERVICE.submit(&req, payload).await
}

pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<SubmissionListQuery>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list(&req, query.into_inner()).await
}

pub async fn preview_submission(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.preview(&req, path.into_inner()).await
}

pub async fn download_submission(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.download(&req, path.into_inner()).await
}

pub async fn set_mark(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<SetMarkRequest>,
) -> ActixResult<HttpResponse> {
    MARK_SERVICE
        .set_mark(&req, path.into_inner(), body.into_inner())
        .await
}

pub async fn get_mark(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    MARK_SERVICE.get_mark(&req, path.into_inner()).await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .service(
                web::resource("")
                    .guard(guard::Post())
                    .wrap(middlewares::RateLimit::submission())
                    .to(create_submission),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .wrap(middleware::Compress::default())
                    .route("", web::get().to(list_submissions))
                    .route("/{id}/preview", web::get().to(preview_submission))
                    .route("/{id}/download", web::get().to(download_submission))
                    .route("/{id}/mark", web::put().to(set_mark))
                    .route("/{id}/mark", web::get().to(get_mark)),
            ),
    );
}
