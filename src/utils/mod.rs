pub mod file_magic;
pub mod format;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod sql;
pub mod validate;

pub use file_magic::{default_mime_type, is_text_extension, validate_magic_bytes};
pub use format::format_file_size;
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::escape_like_pattern;
