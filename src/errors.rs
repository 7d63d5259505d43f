//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! HTTP 层按错误类别映射状态码，见 `services::status_for`。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_teachalloc_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum TeachAllocError {
            $($variant(String),)*
        }

        impl TeachAllocError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(TeachAllocError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(TeachAllocError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(TeachAllocError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl TeachAllocError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        TeachAllocError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_teachalloc_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    Conflict("E007", "Conflict"),
    Serialization("E008", "Serialization Error"),
    DateParse("E009", "Date Parse Error"),
    Authentication("E010", "Authentication Error"),
    Authorization("E011", "Authorization Error"),
}

impl TeachAllocError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TeachAllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TeachAllocError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for TeachAllocError {
    fn from(err: sea_orm::DbErr) -> Self {
        TeachAllocError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TeachAllocError {
    fn from(err: serde_json::Error) -> Self {
        TeachAllocError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for TeachAllocError {
    fn from(err: chrono::ParseError) -> Self {
        TeachAllocError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TeachAllocError>;
