/// 纯文本格式：不检查魔术字节，可直接预览
const TEXT_EXTENSIONS: &[&str] = &["py", "txt", "md", "csv", "json"];

/// 是否为纯文本扩展名（小写、无点号）
pub fn is_text_extension(extension: &str) -> bool {
    TEXT_EXTENSIONS.contains(&extension)
}

/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// `extension` 为小写、不含点号的扩展名。纯文本格式总是通过，
/// 未知的二进制格式一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if is_text_extension(extension) {
        return true;
    }
    if data.is_empty() {
        return false;
    }

    match extension {
        "pdf" => data.starts_with(b"%PDF"),
        // MS Office 旧格式 (OLE Compound Document)
        "doc" | "xls" | "ppt" => {
            data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        }
        // MS Office 新格式 (ZIP-based OOXML)
        "docx" | "xlsx" | "pptx" => data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),
        _ => false,
    }
}

/// 策略表缺失时的 MIME 回退
pub fn default_mime_type(extension: &str) -> &'static str {
    match extension {
        "py" => "text/x-python",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_magic() {
        let pdf_header = b"%PDF-1.4";
        assert!(validate_magic_bytes(pdf_header, "pdf"));
        assert!(!validate_magic_bytes(pdf_header, "doc"));
    }

    #[test]
    fn test_office_magic() {
        let ooxml = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&ooxml, "docx"));
        assert!(validate_magic_bytes(&ooxml, "xlsx"));
        assert!(!validate_magic_bytes(&ooxml, "doc"));
    }

    #[test]
    fn test_text_files_pass() {
        assert!(validate_magic_bytes(b"print('hi')", "py"));
        assert!(validate_magic_bytes(&[], "py"));
        assert!(validate_magic_bytes(&[0xFF, 0xFE], "txt"));
    }

    #[test]
    fn test_empty_binary_rejected() {
        assert!(!validate_magic_bytes(&[], "pdf"));
    }

    #[test]
    fn test_unknown_extension() {
        let data = [0x4D, 0x5A, 0x90, 0x00];
        assert!(!validate_magic_bytes(&data, "exe"));
        assert_eq!(default_mime_type("exe"), "application/octet-stream");
        assert_eq!(default_mime_type("py"), "text/x-python");
    }
}
