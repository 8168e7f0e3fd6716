/*!
 * JWT 认证中间件
 *
 * 校验管理员的 access token，并把 [`AdminSession`] 放入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/marks")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_marks))
 *
 * async fn list_marks(req: HttpRequest) -> Result<HttpResponse> {
 *     let session = RequireJWT::extract_session(&req);
 *     // ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 从 `Authorization: Bearer <token>` 取令牌；WebSocket 握手无法带头时取 `?token=`
 * 2. 校验签名、过期时间和令牌类型
 * 3. 已注销的令牌（缓存中的 `revoked:<token>`）直接拒绝
 * 4. 管理员信息优先取缓存 `admin:<token>`，未命中再查库
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::admins::entities::{Admin, AdminSession};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

/// 已注销令牌的缓存键
pub fn revoked_token_key(token: &str) -> String {
    format!("revoked:{token}")
}

/// 令牌对应管理员的缓存键
pub fn admin_cache_key(token: &str) -> String {
    format!("admin:{token}")
}

#[derive(Clone)]
pub struct RequireJWT;

// 辅助函数：创建错误响应
fn create_error_response(status: StatusCode, message: &str) -> HttpResponse {
    match status {
        StatusCode::NO_CONTENT => HttpResponse::build(status).finish(),
        _ => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(ApiResponse::<()>::error_empty(
                ErrorCode::Unauthorized,
                message,
            )),
    }
}

// 从请求头或查询参数中取令牌
fn extract_token(req: &ServiceRequest) -> Option<String> {
    if let Some(token) = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
    {
        return Some(token.trim().to_string());
    }

    req.query_string()
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == "token")
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

/// 校验令牌并得到会话快照
pub async fn authenticate_token(
    token: &str,
    storage: &Arc<dyn Storage>,
    cache: &Arc<dyn ObjectCache>,
) -> Result<AdminSession, String> {
    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    if let CacheResult::Found(_) = cache.get_raw(&revoked_token_key(token)).await {
        return Err("Token has been revoked".to_string());
    }

    let expires_at = chrono::DateTime::<chrono::Utc>::from_timestamp(claims.exp as i64, 0)
        .ok_or_else(|| "Invalid token expiry".to_string())?;

    if let CacheResult::Found(admin) = cache.get_json::<Admin>(&admin_cache_key(token)).await {
        return Ok(AdminSession::new(&admin, expires_at));
    }

    let admin_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| "Invalid admin ID in JWT".to_string())?;

    let admin = storage
        .get_admin_by_id(admin_id)
        .await
        .map_err(|_| "Failed to retrieve admin from storage".to_string())?
        .ok_or_else(|| "Admin not found".to_string())?;

    cache
        .insert_json(
            admin_cache_key(token),
            &admin,
            AppConfig::get().cache.default_ttl,
        )
        .await;

    Ok(AdminSession::new(&admin, expires_at))
}

// 辅助函数：提取并验证 JWT access token
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<AdminSession, String> {
    let token = extract_token(req).ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone())
        .ok_or_else(|| "Cache not configured".to_string())?;

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| "Storage not configured".to_string())?;

    authenticate_token(&token, &storage, &cache).await
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, "").map_into_right_body(),
                ));
            }

            // 验证 JWT token
            match extract_and_validate_jwt(&req).await {
                Ok(session) => {
                    debug!("JWT authentication successful for admin: {}", session.admin_id);
                    req.extensions_mut().insert(session);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取会话
impl RequireJWT {
    /// 从请求扩展中提取管理员会话
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_session(req: &actix_web::HttpRequest) -> Option<AdminSession> {
        req.extensions().get::<AdminSession>().cloned()
    }

    /// 从请求头中提取原始令牌（用于注销）
    pub fn extract_bearer_token(req: &actix_web::HttpRequest) -> Option<String> {
        req.headers()
            .get(AUTHORIZATION_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix(BEARER_PREFIX))
            .map(|s| s.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_extract_token_prefers_header() {
        let req = TestRequest::default()
            .uri("/api/v1/feed/ws?token=query-token")
            .insert_header((AUTHORIZATION_HEADER, "Bearer header-token"))
            .to_srv_request();
        assert_eq!(extract_token(&req).as_deref(), Some("header-token"));
    }

    #[test]
    fn test_extract_token_from_query() {
        let req = TestRequest::default()
            .uri("/api/v1/feed/ws?x=1&token=abc")
            .to_srv_request();
        assert_eq!(extract_token(&req).as_deref(), Some("abc"));

        let req = TestRequest::default().uri("/api/v1/feed/ws?token=").to_srv_request();
        assert!(extract_token(&req).is_none());
    }

    #[test]
    fn test_cache_keys() {
        assert_eq!(revoked_token_key("t"), "revoked:t");
        assert_eq!(admin_cache_key("t"), "admin:t");
    }
}
