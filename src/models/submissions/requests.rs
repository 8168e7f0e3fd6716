use serde::Deserialize;
use ts_rs::TS;

// 提交列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct SubmissionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_name: Option<String>,
    pub section: Option<String>,
    /// 学生姓名子串，不区分大小写
    pub search: Option<String>,
    /// true=已评分，false=未评分，None=全部
    pub graded: Option<bool>,
}
