pub mod admins;
pub mod auth;
pub mod common;
pub mod extensions;
pub mod marks;
pub mod reports;
pub mod submissions;
pub mod system;

pub use common::{ApiResponse, ErrorCode, PaginationInfo, PaginationQuery};

