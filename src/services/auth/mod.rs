pub mod login;
pub mod logout;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::auth::{LoginRequest, SessionResponse};
use crate::models::{ApiResponse, ErrorCode};

pub use login::sign_in;
pub use logout::revoke_token;

pub struct AuthService;

impl AuthService {
    pub fn new_lazy() -> Self {
        Self
    }

    // 管理员登录
    pub async fn login(&self, login_request: LoginRequest, request: &HttpRequest) -> ActixResult<HttpResponse> {
        login::handle_login(login_request, request).await
    }

    // 注销当前令牌
    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(request).await
    }

    // 当前会话
    pub async fn session(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        match RequireJWT::extract_session(request) {
            Some(session) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                SessionResponse { session },
                "Session retrieved",
            ))),
            None => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Admin session required",
            ))),
        }
    }
}
