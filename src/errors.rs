use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortenerError {
    InvalidRequest(String),
    InvalidUrl(String),
    SelfReference(String),
    UnsupportedMediaType(String),
    Conflict(String),
    NotFound(String),
    Backend(String),
    Config(String),
}

impl ShortenerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortenerError::InvalidRequest(_) => "E001",
            ShortenerError::InvalidUrl(_) => "E002",
            ShortenerError::SelfReference(_) => "E003",
            ShortenerError::UnsupportedMediaType(_) => "E004",
            ShortenerError::Conflict(_) => "E005",
            ShortenerError::NotFound(_) => "E006",
            ShortenerError::Backend(_) => "E007",
            ShortenerError::Config(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortenerError::InvalidRequest(_) => "Invalid Request",
            ShortenerError::InvalidUrl(_) => "Invalid URL",
            ShortenerError::SelfReference(_) => "Self Reference",
            ShortenerError::UnsupportedMediaType(_) => "Unsupported Media Type",
            ShortenerError::Conflict(_) => "Short URL Conflict",
            ShortenerError::NotFound(_) => "Short URL Not Found",
            ShortenerError::Backend(_) => "Backend Error",
            ShortenerError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortenerError::InvalidRequest(msg) => msg,
            ShortenerError::InvalidUrl(msg) => msg,
            ShortenerError::SelfReference(msg) => msg,
            ShortenerError::UnsupportedMediaType(msg) => msg,
            ShortenerError::Conflict(msg) => msg,
            ShortenerError::NotFound(msg) => msg,
            ShortenerError::Backend(msg) => msg,
            ShortenerError::Config(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于启动失败）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortenerError {}

// 便捷的构造函数
impl ShortenerError {
    pub fn invalid_request<T: Into<String>>(msg: T) -> Self {
        ShortenerError::InvalidRequest(msg.into())
    }

    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        ShortenerError::InvalidUrl(msg.into())
    }

    pub fn self_reference<T: Into<String>>(msg: T) -> Self {
        ShortenerError::SelfReference(msg.into())
    }

    pub fn unsupported_media_type<T: Into<String>>(msg: T) -> Self {
        ShortenerError::UnsupportedMediaType(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Conflict(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortenerError::NotFound(msg.into())
    }

    pub fn backend<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Backend(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Config(msg.into())
    }
}

impl From<redis::RedisError> for ShortenerError {
    fn from(err: redis::RedisError) -> Self {
        ShortenerError::Backend(err.to_string())
    }
}

impl From<config::ConfigError> for ShortenerError {
    fn from(err: config::ConfigError) -> Self {
        ShortenerError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortenerError>;
