use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 扩展名策略
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct ExtensionPolicy {
    pub id: i64,
    /// 小写、不含点号
    pub extension: String,
    pub mime_type: String,
    pub enabled: bool,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub updated_by: Option<i64>,
}

/// 规范化扩展名：去掉前导点号并转小写
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".PY"), "py");
        assert_eq!(normalize_extension(" docx "), "docx");
        assert_eq!(normalize_extension("pdf"), "pdf");
    }
}
