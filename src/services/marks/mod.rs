pub mod ledger;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::marks::{
    entities::MarkFilter,
    requests::SetMarkRequest,
    responses::{MarkListResponse, MarkResponse},
};
use crate::models::{ApiResponse, ErrorCode};

pub use ledger::{GradingLedger, validate_score};

pub struct MarkService;

impl MarkService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn set_mark(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        body: SetMarkRequest,
    ) -> ActixResult<HttpResponse> {
        let Some(session) = RequireJWT::extract_session(request) else {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Admin session required",
            )));
        };

        let ledger = GradingLedger::new(super::storage_from(request)?);
        match ledger.set_mark(&session, submission_id, body.score).await {
            Ok(mark) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                MarkResponse::from(mark),
                "Mark saved",
            ))),
            Err(e) => Ok(ApiResponse::from_error(&e)),
        }
    }

    pub async fn get_mark(&self, request: &HttpRequest, submission_id: i64) -> ActixResult<HttpResponse> {
        let ledger = GradingLedger::new(super::storage_from(request)?);
        match ledger.get_mark(submission_id).await {
            Ok(Some(mark)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                MarkResponse::from(mark),
                "Mark retrieved",
            ))),
            Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::MarkNotFound,
                "This submission has not been graded yet",
            ))),
            Err(e) => Ok(ApiResponse::from_error(&e)),
        }
    }

    pub async fn list_marks(&self, request: &HttpRequest, filter: MarkFilter) -> ActixResult<HttpResponse> {
        let ledger = GradingLedger::new(super::storage_from(request)?);
        match ledger.list_marks(filter).await {
            Ok(marks) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                MarkListResponse {
                    items: marks.into_iter().map(MarkResponse::from).collect(),
                },
                "Marks retrieved",
            ))),
            Err(e) => Ok(ApiResponse::from_error(&e)),
        }
    }
}
