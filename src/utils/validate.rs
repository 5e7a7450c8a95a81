use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{5,16}$").expect("username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email regex")
});

/// 5 到 16 位，仅字母、数字、下划线和连字符
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err("Username must be 5-16 characters of letters, digits, '_' or '-'")
    }
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() <= 254 && EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err("Email format is invalid")
    }
}

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "12345678",
    "123456789",
    "qwerty123",
    "abcd1234",
    "admin123",
    "welcome1",
    "letmein1",
    "student1",
];

/// 密码策略：至少 8 位，含大写、小写和数字，且不在常见密码表中
///
/// 返回全部未满足的条目，便于前端一次性提示。
pub fn validate_password(password: &str) -> Result<(), Vec<&'static str>> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if COMMON_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// 拼接成单条消息的版本
pub fn check_password(password: &str) -> Result<(), String> {
    validate_password(password).map_err(|errors| errors.join("; "))
}

/// 非空且去除首尾空白后长度不超过 max
pub fn validate_text(field: &str, value: &str, max: usize) -> Result<(), String> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(format!("{field} must not be empty"));
    }
    if len > max {
        return Err(format!("{field} must be at most {max} characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("bob").is_err());
        assert!(validate_username("a-very-long-username-x").is_err());
        assert!(validate_username("bad name").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("dean@campus.edu").is_ok());
        assert!(validate_email("no-at-sign.edu").is_err());
        assert!(validate_email("x@y").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("Semester2025").is_ok());

        let errors = validate_password("abc").unwrap_err();
        assert!(errors.contains(&"Password must be at least 8 characters long"));
        assert!(errors.contains(&"Password must contain at least one uppercase letter"));
        assert!(errors.contains(&"Password must contain at least one digit"));

        let errors = validate_password("Password1").unwrap_err();
        assert_eq!(
            errors,
            vec!["Password is too common, please choose a stronger password"]
        );
    }

    #[test]
    fn test_check_password_joins_messages() {
        let msg = check_password("ABCDEFGH").unwrap_err();
        assert!(msg.contains("lowercase"));
        assert!(msg.contains("; "));
    }

    #[test]
    fn test_text_bounds() {
        assert!(validate_text("title", "Intro", 10).is_ok());
        assert!(validate_text("title", "   ", 10).is_err());
        assert!(validate_text("title", "abcdefghijk", 10).is_err());
    }
}
