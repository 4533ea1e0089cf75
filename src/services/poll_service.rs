//! 轮询服务 - 业务能力层
//!
//! 先等待 RTOE，然后查询状态；WAITING 时按固定间隔继续，直到终止状态。
//! WAITING 不设上限，依赖服务端自己的结果保留期。

use crate::clients::BlastClient;
use crate::error::{AppError, AppResult};
use crate::infrastructure::Sleeper;
use crate::models::{JobHandle, JobStatus};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info};

/// 状态来源
///
/// 返回 SearchInfo 响应正文
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn search_info(&self, rid: &str) -> AppResult<String>;
}

#[async_trait]
impl StatusSource for BlastClient {
    async fn search_info(&self, rid: &str) -> AppResult<String> {
        BlastClient::search_info(self, rid).await
    }
}

/// 轮询状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// 刚提交，等待 RTOE
    Submitted,
    /// 已查询 `polls` 次，仍在等待
    Waiting { polls: u32 },
    /// 终止状态
    Finished(JobStatus),
}

impl PollState {
    /// 根据一次状态查询的结果转移
    pub fn advance(self, status: JobStatus) -> PollState {
        match (self, status) {
            (PollState::Finished(done), _) => PollState::Finished(done),
            (PollState::Submitted, JobStatus::Waiting) => PollState::Waiting { polls: 1 },
            (PollState::Waiting { polls }, JobStatus::Waiting) => {
                PollState::Waiting { polls: polls + 1 }
            }
            (_, terminal) => PollState::Finished(terminal),
        }
    }
}

/// 轮询完成时的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    /// 状态查询次数（含最后一次 READY）
    pub polls: u32,
}

/// 轮询循环
pub struct PollLoop<'a> {
    source: &'a dyn StatusSource,
    sleeper: &'a dyn Sleeper,
    interval: Duration,
}

impl<'a> PollLoop<'a> {
    pub fn new(source: &'a dyn StatusSource, sleeper: &'a dyn Sleeper, interval: Duration) -> Self {
        Self {
            source,
            sleeper,
            interval,
        }
    }

    /// 轮询直到终止状态
    ///
    /// READY 返回 Ok，FAILED / UNKNOWN / 未知响应分别映射为对应错误。
    pub async fn run(&self, handle: &JobHandle) -> AppResult<PollSummary> {
        let mut state = PollState::Submitted;
        let mut polls = 0;
        self.sleeper.sleep(handle.estimated_wait()).await;

        loop {
            let body = self.source.search_info(&handle.rid).await?;
            let status = JobStatus::classify(&body)?;
            polls += 1;
            debug!("RID {} 第 {} 次查询状态: {:?}", handle.rid, polls, status);

            state = state.advance(status);
            match state {
                PollState::Finished(JobStatus::Ready) => {
                    info!("✓ 搜索完成，正在获取结果...");
                    return Ok(PollSummary { polls });
                }
                PollState::Finished(terminal) => {
                    return Err(terminal_error(terminal, &handle.rid));
                }
                PollState::Submitted | PollState::Waiting { .. } => {
                    info!("⏳ 搜索中...");
                    self.sleeper.sleep(self.interval).await;
                }
            }
        }
    }
}

fn terminal_error(status: JobStatus, rid: &str) -> AppError {
    let rid = rid.to_string();
    let err = match status {
        JobStatus::Failed => AppError::RemoteFailure { rid },
        JobStatus::Expired => AppError::RemoteExpired { rid },
        _ => AppError::UnexpectedState { rid },
    };
    error!("❌ {}", err);
    err
}
