//! 提交服务 - 业务能力层
//!
//! 只负责"提交并拿到 RID"能力

use crate::clients::BlastClient;
use crate::error::AppResult;
use crate::models::{JobHandle, SubmissionParams};
use tracing::info;

pub struct SubmitService {
    client: BlastClient,
}

impl SubmitService {
    pub fn new(client: BlastClient) -> Self {
        Self { client }
    }

    /// 提交搜索并解析任务句柄
    pub async fn submit(&self, params: &SubmissionParams) -> AppResult<JobHandle> {
        let body = self.client.submit_search(params).await?;
        let handle = JobHandle::parse(&body)?;

        info!(
            "📨 搜索已提交，RID: {}，预计 {} 秒完成",
            handle.rid, handle.rtoe_secs
        );

        Ok(handle)
    }
}
