//! 上传前的字段校验
//!
//! 纯函数，不做任何存储读写。所有违规字段一次性返回，便于表单同时展示。

use std::collections::BTreeMap;

use crate::config::AppConfig;
use crate::models::extensions::entities::normalize_extension;
use crate::utils::format_file_size;
use crate::utils::validate::validate_student_name;

pub const FIELD_STUDENT_NAME: &str = "student_name";
pub const FIELD_CLASS_NAME: &str = "class_name";
pub const FIELD_SECTION: &str = "section";
pub const FIELD_FILE: &str = "file";
pub const FIELD_FILE_SIZE: &str = "file_size";

/// 字段名 → 错误信息
pub type FieldErrors = BTreeMap<String, String>;

/// 上传约束
#[derive(Debug, Clone)]
pub struct IntakePolicy {
    /// 小写、无点号
    pub accepted_extensions: Vec<String>,
    pub max_size: u64,
    pub classes: Vec<String>,
    pub sections: Vec<String>,
    pub max_student_name_length: usize,
}

impl IntakePolicy {
    /// 使用配置中的固定扩展名
    pub fn from_config() -> Self {
        let config = AppConfig::get();
        Self::with_extensions(vec![config.upload.accepted_extension.clone()])
    }

    /// 使用给定的扩展名集合，其余约束取自配置
    pub fn with_extensions(extensions: Vec<String>) -> Self {
        let config = AppConfig::get();
        Self {
            accepted_extensions: extensions.iter().map(|e| normalize_extension(e)).collect(),
            max_size: config.upload.max_size as u64,
            classes: config.intake.classes.clone(),
            sections: config.intake.sections.clone(),
            max_student_name_length: config.intake.max_student_name_length,
        }
    }

    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.accepted_extensions.iter().any(|e| e == extension)
    }

    fn extension_list(&self) -> String {
        self.accepted_extensions
            .iter()
            .map(|e| format!(".{e}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// 待校验的提交
#[derive(Debug, Clone, Default)]
pub struct IntakeCandidate {
    pub student_name: String,
    pub class_name: String,
    pub section: String,
    /// 未选择文件时为 None
    pub file_name: Option<String>,
    pub file_size: u64,
}

/// 取文件名的扩展名（小写），没有扩展名时返回 None
pub fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

pub fn validate_candidate(policy: &IntakePolicy, candidate: &IntakeCandidate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Err(msg) = validate_student_name(&candidate.student_name, policy.max_student_name_length) {
        errors.insert(FIELD_STUDENT_NAME.to_string(), msg.to_string());
    }

    let class_name = candidate.class_name.trim();
    if class_name.is_empty() {
        errors.insert(FIELD_CLASS_NAME.to_string(), "Class is required".to_string());
    } else if !policy.classes.iter().any(|c| c == class_name) {
        errors.insert(FIELD_CLASS_NAME.to_string(), format!("Unknown class: {class_name}"));
    }

    let section = candidate.section.trim();
    if section.is_empty() {
        errors.insert(FIELD_SECTION.to_string(), "Section is required".to_string());
    } else if !policy.sections.iter().any(|s| s == section) {
        errors.insert(FIELD_SECTION.to_string(), format!("Unknown section: {section}"));
    }

    match candidate.file_name.as_deref().map(str::trim) {
        None | Some("") => {
            errors.insert(FIELD_FILE.to_string(), "Please choose a file to upload".to_string());
        }
        Some(name) => {
            let accepted = file_extension(name).is_some_and(|ext| policy.accepts_extension(&ext));
            if !accepted {
                errors.insert(
                    FIELD_FILE.to_string(),
                    format!("Only {} files are accepted", policy.extension_list()),
                );
            }
        }
    }

    if candidate.file_size > policy.max_size {
        errors.insert(
            FIELD_FILE_SIZE.to_string(),
            format!(
                "File is {}, the limit is {}",
                format_file_size(candidate.file_size),
                format_file_size(policy.max_size)
            ),
        );
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> IntakePolicy {
        IntakePolicy {
            accepted_extensions: vec!["py".to_string()],
            max_size: 5_242_880,
            classes: vec!["9th".to_string(), "10th".to_string()],
            sections: vec!["A".to_string(), "B".to_string()],
            max_student_name_length: 100,
        }
    }

    fn candidate(file: &str, size: u64) -> IntakeCandidate {
        IntakeCandidate {
            student_name: "Asha".to_string(),
            class_name: "10th".to_string(),
            section: "A".to_string(),
            file_name: Some(file.to_string()),
            file_size: size,
        }
    }

    #[test]
    fn test_accepts_valid_candidate() {
        assert!(validate_candidate(&policy(), &candidate("hw1.py", 1024)).is_ok());
        assert!(validate_candidate(&policy(), &candidate("HW1.PY", 5_242_880)).is_ok());
    }

    #[test]
    fn test_accepts_any_printable_student_name() {
        for name in ["Asha 2", "Ravi_K", "1337", "李明"] {
            let mut c = candidate("hw1.py", 10);
            c.student_name = name.to_string();
            assert!(validate_candidate(&policy(), &c).is_ok(), "rejected {name}");
        }
    }

    #[test]
    fn test_wrong_extension_rejected_regardless_of_size() {
        for size in [0, 10, 5_242_880] {
            let errors = validate_candidate(&policy(), &candidate("report.pdf", size)).unwrap_err();
            assert!(errors.contains_key(FIELD_FILE));
            assert!(!errors.contains_key(FIELD_FILE_SIZE));
        }
        let errors = validate_candidate(&policy(), &candidate("noextension", 10)).unwrap_err();
        assert!(errors.contains_key(FIELD_FILE));
        let errors = validate_candidate(&policy(), &candidate(".py", 10)).unwrap_err();
        assert!(errors.contains_key(FIELD_FILE));
    }

    #[test]
    fn test_oversize_rejected_regardless_of_extension() {
        let errors = validate_candidate(&policy(), &candidate("hw1.py", 5_242_881)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[FIELD_FILE_SIZE].contains("5 MB"));

        let errors = validate_candidate(&policy(), &candidate("hw1.exe", 9_000_000)).unwrap_err();
        assert!(errors.contains_key(FIELD_FILE_SIZE));
        assert!(errors.contains_key(FIELD_FILE));
    }

    #[test]
    fn test_all_field_errors_reported_together() {
        let empty = IntakeCandidate::default();
        let errors = validate_candidate(&policy(), &empty).unwrap_err();
        for field in [FIELD_STUDENT_NAME, FIELD_CLASS_NAME, FIELD_SECTION, FIELD_FILE] {
            assert!(errors.contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_enumerations_enforced() {
        let mut c = candidate("hw1.py", 10);
        c.class_name = "13th".to_string();
        c.section = "Z".to_string();
        let errors = validate_candidate(&policy(), &c).unwrap_err();
        assert!(errors.contains_key(FIELD_CLASS_NAME));
        assert!(errors.contains_key(FIELD_SECTION));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("hw1.PY").as_deref(), Some("py"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension("trailing."), None);
    }
}
