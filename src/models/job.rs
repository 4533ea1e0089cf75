//! 提交参数、任务句柄和任务状态

use crate::error::{AppError, AppResult};
use crate::models::query::Query;
use regex::Regex;
use std::time::Duration;

/// 程序别名展开后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProgram {
    /// 实际提交给服务端的 PROGRAM
    pub program: String,
    /// 附加参数，例如 `MEGABLAST=on`
    pub extra: Option<(&'static str, &'static str)>,
}

/// 展开程序别名
///
/// - `megablast` → `blastn` + `MEGABLAST=on`
/// - `rpsblast` → `blastp` + `SERVICE=rpsblast`
/// - 其他原样透传
pub fn resolve_program(token: &str) -> ResolvedProgram {
    match token {
        "megablast" => ResolvedProgram {
            program: "blastn".to_string(),
            extra: Some(("MEGABLAST", "on")),
        },
        "rpsblast" => ResolvedProgram {
            program: "blastp".to_string(),
            extra: Some(("SERVICE", "rpsblast")),
        },
        other => ResolvedProgram {
            program: other.to_string(),
            extra: None,
        },
    }
}

/// 一次提交所需的全部参数
#[derive(Debug, Clone)]
pub struct SubmissionParams {
    pub program: ResolvedProgram,
    pub database: String,
    /// 所有查询编码后直接拼接，无分隔符
    pub encoded_query: String,
    /// 第一个查询，只有它的标识和序列进入结果行
    pub primary: Query,
}

impl SubmissionParams {
    /// 构建提交参数
    ///
    /// 多个查询文件时，只保留第一个文件的元数据，但所有文件的内容都合并提交。
    pub fn new(program: &str, database: &str, queries: &[Query]) -> AppResult<Self> {
        let primary = queries
            .first()
            .cloned()
            .ok_or_else(|| AppError::Argument("至少需要一个查询文件".to_string()))?;

        let encoded_query = queries.iter().map(|q| q.encoded.as_str()).collect::<String>();

        Ok(Self {
            program: resolve_program(program),
            database: database.to_string(),
            encoded_query,
            primary,
        })
    }
}

/// 提交成功后得到的任务句柄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    /// 请求 ID (RID)
    pub rid: String,
    /// 预计完成时间（秒）
    pub rtoe_secs: u64,
}

impl JobHandle {
    pub fn estimated_wait(&self) -> Duration {
        Duration::from_secs(self.rtoe_secs)
    }

    /// 从提交响应中解析 RID 和 RTOE
    pub fn parse(body: &str) -> AppResult<Self> {
        let rid_re = Regex::new(r"(?m)^\s*RID\s*=\s*(\S+)")?;
        let rtoe_re = Regex::new(r"(?m)^\s*RTOE\s*=\s*(\d+)")?;

        let rid = rid_re
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
        let rtoe = rtoe_re
            .captures(body)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok());

        match (rid, rtoe) {
            (Some(rid), Some(rtoe_secs)) => Ok(Self { rid, rtoe_secs }),
            _ => Err(AppError::Submission("无法解析 RID 或 RTOE".to_string())),
        }
    }
}

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Waiting,
    Ready,
    Failed,
    /// 服务端返回 UNKNOWN，结果已过期
    Expired,
    /// 响应中没有任何已知标记
    Unexpected,
}

impl JobStatus {
    /// 按 WAITING → FAILED → UNKNOWN → READY 的顺序匹配状态标记
    pub fn classify(body: &str) -> AppResult<Self> {
        const MARKERS: [(&str, JobStatus); 4] = [
            ("WAITING", JobStatus::Waiting),
            ("FAILED", JobStatus::Failed),
            ("UNKNOWN", JobStatus::Expired),
            ("READY", JobStatus::Ready),
        ];

        for (marker, status) in MARKERS {
            let re = Regex::new(&format!(r"(?m)^\s*Status={}", marker))?;
            if re.is_match(body) {
                return Ok(status);
            }
        }
        Ok(JobStatus::Unexpected)
    }

    pub fn is_terminal(self) -> bool {
        self != JobStatus::Waiting
    }
}
