use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// BLAST 服务地址
    pub base_url: String,
    /// 请求头中的 User-Agent
    pub user_agent: String,
    /// 两次状态查询之间的间隔（秒）
    pub poll_interval_secs: u64,
    /// 是否跳过证书校验
    ///
    /// 部分运行环境的证书库与服务端证书链不匹配，默认放宽校验。
    pub accept_invalid_certs: bool,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 批量处理配置 ---
    /// 序列文件存放目录
    pub query_folder: String,
    /// 结果 CSV 输出目录
    pub output_folder: String,
    pub batch_program: String,
    pub batch_database: String,
    /// 两次查询之间的间隔（秒），遵守服务端频率限制
    pub inter_query_delay_secs: u64,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://blast.ncbi.nlm.nih.gov/blast/Blast.cgi".to_string(),
            user_agent: "web_blast (Rust reqwest)".to_string(),
            poll_interval_secs: 5,
            accept_invalid_certs: true,
            request_timeout_secs: 120,
            verbose_logging: false,
            query_folder: "queries".to_string(),
            output_folder: ".".to_string(),
            batch_program: "blastn".to_string(),
            batch_database: "nt".to_string(),
            inter_query_delay_secs: 10,
            output_log_file: "blast_run.log".to_string(),
        }
    }
}

impl Config {
    /// 读取配置
    ///
    /// 先加载 `WEB_BLAST_CONFIG` 指向的 TOML 文件（如果设置），再用环境变量覆盖。
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("WEB_BLAST_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，缺失的字段取默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    fn with_env_overrides(self) -> Self {
        Self {
            base_url: std::env::var("BLAST_BASE_URL").unwrap_or(self.base_url),
            user_agent: std::env::var("BLAST_USER_AGENT").unwrap_or(self.user_agent),
            poll_interval_secs: env_parse("BLAST_POLL_INTERVAL_SECS").unwrap_or(self.poll_interval_secs),
            accept_invalid_certs: env_parse("BLAST_ACCEPT_INVALID_CERTS").unwrap_or(self.accept_invalid_certs),
            request_timeout_secs: env_parse("BLAST_REQUEST_TIMEOUT_SECS").unwrap_or(self.request_timeout_secs),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
            query_folder: std::env::var("QUERY_FOLDER").unwrap_or(self.query_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(self.output_folder),
            batch_program: std::env::var("BATCH_PROGRAM").unwrap_or(self.batch_program),
            batch_database: std::env::var("BATCH_DATABASE").unwrap_or(self.batch_database),
            inter_query_delay_secs: env_parse("INTER_QUERY_DELAY_SECS").unwrap_or(self.inter_query_delay_secs),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        }
    }

    /// HTTP 传输层配置
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            accept_invalid_certs: self.accept_invalid_certs,
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn inter_query_delay(&self) -> Duration {
        Duration::from_secs(self.inter_query_delay_secs)
    }
}

/// 构建 HTTP 客户端所需的全部信息
///
/// 证书校验策略只通过这里传给客户端，不修改任何进程级状态。
#[derive(Clone, Debug)]
pub struct TransportConfig {
    pub base_url: String,
    pub user_agent: String,
    pub accept_invalid_certs: bool,
    pub timeout: Duration,
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            batch_program = "megablast"
            inter_query_delay_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.batch_program, "megablast");
        assert_eq!(config.inter_query_delay_secs, 30);
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.batch_database, "nt");
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml_str("poll_interval_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_transport_carries_trust_setting() {
        let config = Config {
            accept_invalid_certs: false,
            request_timeout_secs: 7,
            ..Config::default()
        };
        let transport = config.transport();
        assert!(!transport.accept_invalid_certs);
        assert_eq!(transport.timeout, Duration::from_secs(7));
        assert_eq!(transport.base_url, config.base_url);
    }
}
