use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 四元组重复时返回给提交者的固定提示
pub const DUPLICATE_SUBMISSION_MESSAGE: &str = "A submission with this file name already exists for this student. Please contact your instructor.";

/// 一次作业提交，创建后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Submission {
    pub id: i64,
    pub student_name: String,
    pub class_name: String,
    pub section: String,
    pub file_name: String,
    pub extension: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub storage_key: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Submission {
    pub fn tuple(&self) -> SubmissionTuple {
        SubmissionTuple {
            student_name: self.student_name.clone(),
            class_name: self.class_name.clone(),
            section: self.section.clone(),
            file_name: self.file_name.clone(),
        }
    }
}

/// 查重键：(学生, 班级, 分组, 文件名) 四元组
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionTuple {
    pub student_name: String,
    pub class_name: String,
    pub section: String,
    pub file_name: String,
}

/// 待写入的提交记录（文件已写入 blob 存储之后）
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub student_name: String,
    pub class_name: String,
    pub section: String,
    pub file_name: String,
    pub extension: String,
    pub storage_key: String,
    pub file_size: i64,
    pub mime_type: String,
}

impl NewSubmission {
    pub fn tuple(&self) -> SubmissionTuple {
        SubmissionTuple {
            student_name: self.student_name.clone(),
            class_name: self.class_name.clone(),
            section: self.section.clone(),
            file_name: self.file_name.clone(),
        }
    }
}
