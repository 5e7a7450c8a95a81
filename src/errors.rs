//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_lms_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum LmsError {
            $($variant(String),)*
        }

        impl LmsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(LmsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(LmsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(LmsError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl LmsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        LmsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_lms_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    DatabaseConfig("E002", "Database Configuration Error"),
    DatabaseConnection("E003", "Database Connection Error"),
    DatabaseOperation("E004", "Database Operation Error"),
    FileOperation("E005", "File Operation Error"),
    Validation("E006", "Validation Error"),
    NotFound("E007", "Resource Not Found"),
    Serialization("E008", "Serialization Error"),
    DateParse("E009", "Date Parse Error"),
    Authentication("E010", "Authentication Error"),
    Conflict("E011", "Resource Conflict"),
    PaymentGateway("E012", "Payment Gateway Error"),
}

impl LmsError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LmsError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LmsError {
    fn from(err: sea_orm::DbErr) -> Self {
        LmsError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LmsError {
    fn from(err: std::io::Error) -> Self {
        LmsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LmsError {
    fn from(err: serde_json::Error) -> Self {
        LmsError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LmsError {
    fn from(err: chrono::ParseError) -> Self {
        LmsError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LmsError::cache_connection("test").code(), "E001");
        assert_eq!(LmsError::database_config("test").code(), "E002");
        assert_eq!(LmsError::validation("test").code(), "E006");
        assert_eq!(LmsError::authentication("test").code(), "E010");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            LmsError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            LmsError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_domain_error_codes() {
        assert_eq!(LmsError::conflict("dup").code(), "E011");
        assert_eq!(
            LmsError::payment_gateway("declined").error_type(),
            "Payment Gateway Error"
        );
    }

    #[test]
    fn test_from_db_err() {
        let err: LmsError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "E004");
        assert_eq!(err.message(), "Custom Error: boom");
    }

    #[test]
    fn test_error_message() {
        let err = LmsError::not_found("Course 7 not found");
        assert_eq!(err.message(), "Course 7 not found");
        assert_eq!(err.to_string(), "Resource Not Found: Course 7 not found");
    }

    #[test]
    fn test_format_simple() {
        let err = LmsError::validation("Credits must be positive");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Credits must be positive"));
    }
}
