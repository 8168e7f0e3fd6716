use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// 每页条数上限
pub const MAX_PAGE_SIZE: i64 = 100;

// 分页查询参数
#[derive(Debug, Clone, Copy, Deserialize, TS)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PaginationQuery {
    /// 规范化页码与每页条数（页码从 1 开始）
    pub fn normalized(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1) as u64;
        let size = self
            .size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE) as u64;
        (page, size)
    }
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn new(page: u64, size: u64, total: u64) -> Self {
        Self {
            page: page as i64,
            page_size: size as i64,
            total: total as i64,
            total_pages: total.div_ceil(size.max(1)) as i64,
        }
    }
}
