use chrono_tz::Tz;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (`.env` 由 dotenv 加载)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | ./data/pos.db | SQLite 数据库文件 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TIMEZONE | America/Santo_Domingo | 业务时区 (日报/对账) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置 = stdout) | 日志目录 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | BUS_CAPACITY | 1024 | 通知广播通道容量 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 DATABASE_PATH=/data/pos.db cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库路径
    pub database_path: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 业务时区
    pub timezone: Tz,
    /// 日志级别
    pub log_level: String,
    /// 日志目录 (None = 只输出到 stdout)
    pub log_dir: Option<String>,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 通知广播通道容量
    pub bus_capacity: usize,
}

/// Default business timezone (Dominican Republic)
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Santo_Domingo;

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/pos.db".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| {
                    tz.parse::<Tz>()
                        .map_err(|e| tracing::warn!("Invalid TIMEZONE '{}': {}", tz, e))
                        .ok()
                })
                .unwrap_or(DEFAULT_TIMEZONE),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            bus_capacity: std::env::var("BUS_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|c: &usize| *c > 0)
                .unwrap_or(1024),
        }
    }

    /// 测试用配置 (不读取环境变量)
    pub fn for_tests() -> Self {
        Self {
            http_port: 0,
            database_path: ":memory:".into(),
            environment: "test".into(),
            timezone: DEFAULT_TIMEZONE,
            log_level: "debug".into(),
            log_dir: None,
            request_timeout_ms: 30000,
            bus_capacity: 64,
        }
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_for_tests() {
        let config = Config::for_tests();
        assert_eq!(config.timezone, chrono_tz::America::Santo_Domingo);
        assert!(!config.is_development());
        assert!(config.bus_capacity > 0);
    }
}
