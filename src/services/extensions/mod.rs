pub mod registry;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::extensions::{
    requests::SetExtensionEnabledRequest, responses::ExtensionListResponse,
};
use crate::models::{ApiResponse, ErrorCode};

pub use registry::ExtensionRegistry;

pub struct ExtensionService;

impl ExtensionService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn list(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let registry = ExtensionRegistry::new(super::storage_from(request)?);
        match registry.list().await {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                ExtensionListResponse { items },
                "Extension policies retrieved",
            ))),
            Err(e) => Ok(ApiResponse::from_error(&e)),
        }
    }

    pub async fn set_enabled(
        &self,
        request: &HttpRequest,
        id: i64,
        body: SetExtensionEnabledRequest,
    ) -> ActixResult<HttpResponse> {
        let Some(session) = RequireJWT::extract_session(request) else {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Admin session required",
            )));
        };

        let registry = ExtensionRegistry::new(super::storage_from(request)?);
        match registry.set_enabled(&session, id, body.enabled).await {
            Ok(policy) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                policy,
                "Extension policy updated",
            ))),
            Err(e) => Ok(ApiResponse::from_error(&e)),
        }
    }
}
