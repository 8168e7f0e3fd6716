use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+(\.[A-Za-z]{2,})?$").expect("Invalid email regex")
});

pub fn validate_student_name(name: &str, max_length: usize) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Student name is required");
    }
    if name.chars().count() > max_length {
        return Err("Student name is too long");
    }
    if name.chars().any(char::is_control) {
        return Err("Student name must not contain control characters");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_names() {
        assert!(validate_student_name("Asha", 100).is_ok());
        assert!(validate_student_name("Mary-Jane O'Neil", 100).is_ok());
        assert!(validate_student_name("José Álvarez", 100).is_ok());
        assert_eq!(validate_student_name("  ", 100), Err("Student name is required"));
        assert!(validate_student_name("Asha 2", 100).is_ok());
        assert!(validate_student_name("Ravi_K", 100).is_ok());
        assert!(validate_student_name("1337", 100).is_ok());
        assert_eq!(
            validate_student_name("Asha\u{0}", 100),
            Err("Student name must not contain control characters")
        );
        assert!(validate_student_name("Asha\nRavi", 100).is_err());
        assert_eq!(validate_student_name("Asha", 3), Err("Student name is too long"));
    }

    #[test]
    fn test_emails() {
        assert!(validate_email("admin@school.test").is_ok());
        assert!(validate_email("admin@localhost").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }
}
