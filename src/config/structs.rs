use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShortenerError};
use crate::utils::format_duration;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，分隔符为 `__`，例如 `SHORTENER__STORE__EXPIRY=1h`
pub const ENV_PREFIX: &str = "SHORTENER";

/// Longest accepted `store.expiry` (ten years)
pub const MAX_EXPIRY: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// 静态配置（从 TOML 与环境变量加载，启动时使用）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > 配置文件 > 默认值。
    /// An explicitly given path must exist; the default `config.toml` is optional.
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let (path, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        let settings = Config::builder()
            .add_source(File::with_name(path).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that deserialize fine but cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(ShortenerError::config("server.host cannot be empty"));
        }
        if self.server.workers == 0 {
            return Err(ShortenerError::config("server.workers must be at least 1"));
        }
        if self.store.redis.address.trim().is_empty() && self.store.backend == StoreBackend::Redis
        {
            return Err(ShortenerError::config(
                "store.redis.address cannot be empty when the redis backend is selected",
            ));
        }
        if self.store.expiry.as_secs() == 0 {
            return Err(ShortenerError::config("store.expiry must be at least one second"));
        }
        if self.store.expiry > MAX_EXPIRY {
            return Err(ShortenerError::config(format!(
                "store.expiry must not exceed {}",
                format_duration(MAX_EXPIRY)
            )));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ShortenerError::config(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Address the service is reachable at; URLs pointing here are refused.
    #[serde(default)]
    pub public_address: Option<String>,
    #[serde(default = "default_read_timeout", with = "duration_serde")]
    pub read_timeout: Duration,
    #[serde(default = "default_write_timeout", with = "duration_serde")]
    pub write_timeout: Duration,
    #[serde(default = "default_idle_timeout", with = "duration_serde")]
    pub idle_timeout: Duration,
    #[serde(default = "default_shutdown_timeout", with = "duration_serde")]
    pub shutdown_timeout: Duration,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn public_address(&self) -> String {
        self.public_address
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| self.bind_address())
    }
}

/// 存储后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redis => write!(f, "redis"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// 映射存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Lifetime of a mapping, reset on every successful resolve.
    #[serde(default = "default_expiry", with = "duration_serde")]
    pub expiry: Duration,
    #[serde(default)]
    pub redis: RedisConfig,
}

/// Redis 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_address")]
    pub address: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub database: i64,
}

impl RedisConfig {
    /// Assemble a `redis://` connection URL from the individual settings.
    pub fn connection_url(&self) -> String {
        let address = self.address.trim();
        let address = address
            .strip_prefix("redis://")
            .unwrap_or(address)
            .trim_end_matches('/');
        if self.password.is_empty() {
            format!("redis://{}/{}", address, self.database)
        } else {
            format!(
                "redis://:{}@{}/{}",
                urlencoding::encode(&self.password),
                address,
                self.database
            )
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_read_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_write_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_idle_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_workers() -> usize {
    num_cpus::get().clamp(1, 32)
}

fn default_expiry() -> Duration {
    Duration::from_secs(24 * 3600)
}

fn default_redis_address() -> String {
    "127.0.0.1:6379".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            public_address: None,
            read_timeout: default_read_timeout(),
            write_timeout: default_write_timeout(),
            idle_timeout: default_idle_timeout(),
            shutdown_timeout: default_shutdown_timeout(),
            workers: default_workers(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            expiry: default_expiry(),
            redis: RedisConfig::default(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            address: default_redis_address(),
            password: String::new(),
            database: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

/// Durations are written as `"24h"` / `"1d12h"` or a bare number of seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    use crate::utils::{format_duration, parse_duration};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Seconds(0) => Err(serde::de::Error::custom("duration cannot be zero")),
            Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
            Raw::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom),
        }
    }
}
