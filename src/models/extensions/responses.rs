use serde::Serialize;
use ts_rs::TS;

use crate::models::extensions::entities::ExtensionPolicy;

#[derive(Debug, Serialize, TS)]
pub struct ExtensionListResponse {
    pub items: Vec<ExtensionPolicy>,
}
