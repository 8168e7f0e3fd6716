use serde::Serialize;
use ts_rs::TS;

use crate::models::admins::entities::{Admin, AdminSession};

#[derive(Debug, Serialize, TS)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub admin: Admin,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, TS)]
pub struct SessionResponse {
    pub session: AdminSession,
}
