use std::time::Duration;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 摘要服务地址
    pub endpoint_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 表格文件路径（CSV）
    pub sheet_path: String,
    /// 批处理参数文件（TOML）
    pub batch_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: "http://127.0.0.1:5000/summarize".to_string(),
            request_timeout_secs: 30,
            sheet_path: "sheet.csv".to_string(),
            batch_file: "batch.toml".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            endpoint_url: std::env::var("SUMMARIZER_ENDPOINT").unwrap_or(default.endpoint_url),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.request_timeout_secs),
            sheet_path: std::env::var("SHEET_PATH").unwrap_or(default.sheet_path),
            batch_file: std::env::var("BATCH_FILE").unwrap_or(default.batch_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 环境变量是进程级共享的，所有读写放在同一个测试里
    #[test]
    fn test_from_env_overrides_and_fallbacks() {
        std::env::set_var("REQUEST_TIMEOUT_SECS", "abc");
        std::env::set_var("VERBOSE_LOGGING", "maybe");
        let config = Config::from_env();
        assert_eq!(config.request_timeout_secs, 30);
        assert!(!config.verbose_logging);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));

        std::env::set_var("REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("VERBOSE_LOGGING", "true");
        std::env::set_var("SUMMARIZER_ENDPOINT", "http://localhost:9000/summarize");
        let config = Config::from_env();
        assert_eq!(config.request_timeout_secs, 5);
        assert!(config.verbose_logging);
        assert_eq!(config.endpoint_url, "http://localhost:9000/summarize");

        std::env::remove_var("REQUEST_TIMEOUT_SECS");
        std::env::remove_var("VERBOSE_LOGGING");
        std::env::remove_var("SUMMARIZER_ENDPOINT");
        let config = Config::from_env();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.endpoint_url, Config::default().endpoint_url);
    }
}
