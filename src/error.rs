//! 错误类型
//!
//! 每个变体对应单条查询处理中的一种终止原因，
//! `exit_code()` 给出命令行约定的退出码。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 调用参数缺失或格式错误
    #[error("参数错误: {0}")]
    Argument(String),

    /// 文件读写失败
    #[error("文件读写失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 提交响应无法解析出 RID / RTOE，或 HTTP 状态异常
    #[error("提交失败: {0}")]
    Submission(String),

    /// 远端报告 Status=FAILED
    #[error("搜索 {rid} 失败; 请联系 blast-help@ncbi.nlm.nih.gov")]
    RemoteFailure { rid: String },

    /// 远端报告 Status=UNKNOWN
    #[error("搜索 {rid} 已过期")]
    RemoteExpired { rid: String },

    /// 状态响应不含任何已知标记
    #[error("搜索 {rid} 返回了未知状态")]
    UnexpectedState { rid: String },

    /// 结果中没有任何命中
    #[error("搜索 {rid} 没有命中结果")]
    NoHit { rid: String },

    /// 结果结构缺少必要字段
    #[error("结果结构缺少字段: {field}")]
    MalformedResult { field: String },

    /// query_len 为 0，无法计算覆盖率与一致性
    #[error("查询序列长度为 0，无法计算百分比")]
    ZeroQueryLength,

    /// 网络请求失败
    #[error("HTTP 请求失败 ({endpoint}): {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// JSON 解析失败
    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 正则表达式构建失败
    #[error("正则表达式错误: {0}")]
    Regex(#[from] regex::Error),

    /// 配置文件错误
    #[error("配置错误: {0}")]
    Config(String),
}

impl AppError {
    /// 进程退出码
    ///
    /// 0 成功, 1 参数/通用错误, 2 无命中, 3 任务过期, 4 搜索失败, 5 未知状态
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::NoHit { .. } => 2,
            AppError::RemoteExpired { .. } => 3,
            AppError::RemoteFailure { .. } => 4,
            AppError::UnexpectedState { .. } => 5,
            _ => 1,
        }
    }

    // ========== 便捷构造函数 ==========

    /// 创建文件读写错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// 创建HTTP请求失败错误
    pub fn http_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Http {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建结果缺字段错误
    pub fn missing_field(field: impl Into<String>) -> Self {
        AppError::MalformedResult {
            field: field.into(),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
