use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 分数下限
pub const MIN_SCORE: i32 = 0;
/// 分数上限
pub const MAX_SCORE: i32 = 100;

/// 评分记录，每个提交至多一条
///
/// 学生姓名、班级、分组为评分时从提交复制的快照，提交记录才是权威来源。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Mark {
    pub id: i64,
    pub submission_id: i64,
    pub student_name: String,
    pub class_name: String,
    pub section: String,
    pub score: i32,
    pub graded_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 评分列表的等值筛选条件
#[derive(Debug, Clone, Default, PartialEq, Deserialize, TS)]
pub struct MarkFilter {
    pub class_name: Option<String>,
    pub section: Option<String>,
}

impl MarkFilter {
    pub fn matches(&self, mark: &Mark) -> bool {
        self.class_name
            .as_ref()
            .is_none_or(|c| c == &mark.class_name)
            && self.section.as_ref().is_none_or(|s| s == &mark.section)
    }
}
