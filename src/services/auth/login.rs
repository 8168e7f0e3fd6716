use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{PortalError, Result};
use crate::models::admins::entities::Admin;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

const INVALID_CREDENTIALS: &str = "Email or password is incorrect";

/// 校验邮箱和密码，成功后签发 access token
pub async fn sign_in(storage: &Arc<dyn Storage>, email: &str, password: &str) -> Result<(Admin, String)> {
    let admin = storage
        .get_admin_by_email(email.trim())
        .await?
        .ok_or_else(|| PortalError::authentication(INVALID_CREDENTIALS))?;

    if !verify_password(password, &admin.password_hash) {
        return Err(PortalError::authentication(INVALID_CREDENTIALS));
    }

    let token = JwtUtils::generate_access_token(admin.id, &admin.email).map_err(|e| {
        tracing::error!("Failed to generate JWT token: {}", e);
        PortalError::authentication("Login failed, unable to generate token")
    })?;

    if let Err(e) = storage.update_admin_last_login(admin.id).await {
        tracing::warn!("Failed to update last login for admin {}: {}", admin.id, e);
    }

    Ok((admin, token))
}

pub async fn handle_login(login_request: LoginRequest, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = crate::services::storage_from(request)?;

    match sign_in(&storage, &login_request.email, &login_request.password).await {
        Ok((admin, access_token)) => {
            tracing::info!("Admin {} logged in successfully", admin.email);
            let response = LoginResponse {
                access_token,
                expires_in: JwtUtils::access_token_ttl_secs(),
                admin,
                created_at: chrono::Utc::now(),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
        }
        Err(PortalError::Authentication(msg)) => Ok(HttpResponse::Unauthorized()
            .json(ApiResponse::error_empty(ErrorCode::AuthFailed, msg))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::utils::password::hash_password;

    async fn storage_with_admin() -> Arc<dyn Storage> {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let hash = hash_password("correct horse").unwrap();
        storage
            .create_admin("Instructor@School.test", &hash, Some("Instructor".to_string()))
            .await
            .unwrap();
        storage
    }

    #[tokio::test]
    async fn test_sign_in_issues_token() {
        let storage = storage_with_admin().await;
        let (admin, token) = sign_in(&storage, "instructor@school.test", "correct horse")
            .await
            .unwrap();

        let claims = JwtUtils::verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, admin.id.to_string());

        let refreshed = storage.get_admin_by_id(admin.id).await.unwrap().unwrap();
        assert!(refreshed.last_login.is_some());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let storage = storage_with_admin().await;
        let wrong = sign_in(&storage, "instructor@school.test", "nope").await.unwrap_err();
        let unknown = sign_in(&storage, "ghost@school.test", "correct horse")
            .await
            .unwrap_err();
        assert_eq!(wrong, unknown);
        assert!(matches!(wrong, PortalError::Authentication(_)));
    }
}
