//! 查询处理流程 - 流程层
//!
//! 核心职责：定义"一条查询"的完整处理流程
//!
//! 流程顺序：
//! 1. 加载序列文件
//! 2. 提交 → RID / RTOE
//! 3. 轮询直到 READY
//! 4. 获取结果 → ResultRecord

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::clients::BlastClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{Sleeper, TokioSleeper};
use crate::models::{load_queries, ResultRecord, SubmissionParams};
use crate::services::{ExtractService, PollLoop, SubmitService};
use crate::workflow::query_ctx::QueryCtx;

/// 查询处理流程
///
/// - 严格顺序执行，不并发
/// - 任何一步失败都直接返回错误，不重试
pub struct QueryFlow {
    client: BlastClient,
    submit_service: SubmitService,
    extract_service: ExtractService,
    sleeper: Arc<dyn Sleeper>,
    poll_interval: Duration,
}

impl QueryFlow {
    /// 创建使用真实时间等待的流程
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_sleeper(config, Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(config: &Config, sleeper: Arc<dyn Sleeper>) -> AppResult<Self> {
        let client = BlastClient::new(&config.transport())?;
        Ok(Self {
            submit_service: SubmitService::new(client.clone()),
            extract_service: ExtractService::new(client.clone()),
            client,
            sleeper,
            poll_interval: config.poll_interval(),
        })
    }

    pub fn sleeper(&self) -> &dyn Sleeper {
        self.sleeper.as_ref()
    }

    pub async fn run(&self, ctx: &QueryCtx) -> AppResult<ResultRecord> {
        info!("{} 📄 加载 {} 个序列文件", ctx, ctx.query_paths.len());
        let queries = load_queries(&ctx.query_paths).await?;
        let params = SubmissionParams::new(&ctx.program, &ctx.database, &queries)?;

        info!("{} 📤 正在提交搜索...", ctx);
        let handle = self.submit_service.submit(&params).await?;

        let summary = PollLoop::new(&self.client, self.sleeper.as_ref(), self.poll_interval)
            .run(&handle)
            .await?;
        info!("{} ✓ 共查询状态 {} 次", ctx, summary.polls);

        self.extract_service.fetch_record(&handle, &params.primary).await
    }
}
