use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::middlewares::RequireJWT;
use crate::middlewares::require_jwt::{admin_cache_key, revoked_token_key};
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// 在令牌剩余有效期内将其标记为已注销
pub async fn revoke_token(cache: &Arc<dyn ObjectCache>, token: &str) {
    cache.remove(&admin_cache_key(token)).await;

    let Ok(claims) = JwtUtils::verify_access_token(token) else {
        return;
    };
    let ttl = claims.remaining_secs();
    if ttl > 0 {
        cache
            .insert_raw(revoked_token_key(token), "1".to_string(), ttl)
            .await;
    }
}

/// 处理管理员登出
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let cache = crate::services::cache_from(request)?;

    if let Some(token) = RequireJWT::extract_bearer_token(request) {
        revoke_token(&cache, &token).await;
    }
    if let Some(session) = RequireJWT::extract_session(request) {
        tracing::info!("Admin {} logged out", session.email);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Logout successful")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheResult;
    use crate::cache::object_cache::moka::MokaCacheWrapper;

    #[tokio::test]
    async fn test_revoked_token_is_remembered() {
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(100, 60));
        let token = JwtUtils::generate_access_token(1, "admin@localhost").unwrap();

        revoke_token(&cache, &token).await;

        assert!(matches!(
            cache.get_raw(&revoked_token_key(&token)).await,
            CacheResult::Found(_)
        ));
    }

    #[tokio::test]
    async fn test_garbage_token_is_ignored() {
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(100, 60));
        revoke_token(&cache, "not-a-jwt").await;
        assert!(matches!(
            cache.get_raw(&revoked_token_key("not-a-jwt")).await,
            CacheResult::NotFound
        ));
    }
}
