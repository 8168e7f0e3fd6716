pub mod auth;
pub mod extensions;
pub mod feed;
pub mod intake;
pub mod marks;
pub mod reports;
pub mod submissions;
pub mod system;

pub use auth::AuthService;
pub use extensions::ExtensionService;
pub use feed::FeedService;
pub use intake::IntakeService;
pub use marks::MarkService;
pub use reports::ReportService;
pub use submissions::SubmissionService;
pub use system::SystemService;

use actix_web::{HttpRequest, error::ErrorInternalServerError, web::Data};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::storage::{BlobStore, Storage};

// 从 app_data 取共享组件，缺失属于启动配置错误
fn shared<T: ?Sized + 'static>(request: &HttpRequest, what: &str) -> actix_web::Result<Arc<T>> {
    request
        .app_data::<Data<Arc<T>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            tracing::error!("{} not found in app data", what);
            ErrorInternalServerError(format!("{what} not configured"))
        })
}

pub(crate) fn storage_from(request: &HttpRequest) -> actix_web::Result<Arc<dyn Storage>> {
    shared::<dyn Storage>(request, "Storage")
}

pub(crate) fn blob_store_from(request: &HttpRequest) -> actix_web::Result<Arc<dyn BlobStore>> {
    shared::<dyn BlobStore>(request, "Blob store")
}

pub(crate) fn cache_from(request: &HttpRequest) -> actix_web::Result<Arc<dyn ObjectCache>> {
    shared::<dyn ObjectCache>(request, "Cache")
}
