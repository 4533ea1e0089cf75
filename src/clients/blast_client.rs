/// BLAST URL API 客户端
///
/// 封装提交、状态查询、结果获取三种请求
use crate::config::TransportConfig;
use crate::error::{AppError, AppResult};
use crate::models::{BlastJsonReport, SubmissionParams};
use tracing::{debug, warn};
use urlencoding::encode;

/// BLAST 客户端
///
/// 内部的 reqwest::Client 可以安全地 clone，所有请求共享同一个连接池。
#[derive(Clone)]
pub struct BlastClient {
    http: reqwest::Client,
    base_url: String,
}

impl BlastClient {
    /// 创建新的 BLAST 客户端
    pub fn new(transport: &TransportConfig) -> AppResult<Self> {
        if transport.accept_invalid_certs {
            warn!("⚠️ 已关闭 TLS 证书校验 (accept_invalid_certs = true)");
        }

        let http = reqwest::Client::builder()
            .user_agent(transport.user_agent.clone())
            .danger_accept_invalid_certs(transport.accept_invalid_certs)
            .timeout(transport.timeout)
            .build()
            .map_err(|e| AppError::http_failed(&transport.base_url, e))?;

        Ok(Self {
            http,
            base_url: transport.base_url.clone(),
        })
    }

    /// 提交搜索 (CMD=Put)
    ///
    /// # 返回
    /// 返回响应正文，由调用方解析 RID / RTOE
    pub async fn submit_search(&self, params: &SubmissionParams) -> AppResult<String> {
        let url = self.submit_url(params);
        debug!("提交搜索: PROGRAM={} DATABASE={}", params.program.program, params.database);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::http_failed(&self.base_url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Submission(format!("HTTP {}", status.as_u16())));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::http_failed(&self.base_url, e))
    }

    /// 查询任务状态 (CMD=Get&FORMAT_OBJECT=SearchInfo)
    pub async fn search_info(&self, rid: &str) -> AppResult<String> {
        let url = format!(
            "{}?CMD=Get&FORMAT_OBJECT=SearchInfo&RID={}",
            self.base_url,
            encode(rid)
        );
        self.get_text(&url).await
    }

    /// 获取结构化结果 (CMD=Get&FORMAT_TYPE=JSON2_S)
    pub async fn fetch_report(&self, rid: &str) -> AppResult<BlastJsonReport> {
        let url = format!(
            "{}?CMD=Get&FORMAT_TYPE=JSON2_S&RID={}",
            self.base_url,
            encode(rid)
        );
        let body = self.get_text(&url).await?;
        debug!("结果正文长度: {} 字节", body.len());
        Ok(serde_json::from_str(&body)?)
    }

    /// 构建提交 URL
    ///
    /// QUERY 已经是百分号编码，原样拼接。
    fn submit_url(&self, params: &SubmissionParams) -> String {
        let mut url = format!(
            "{}?CMD=Put&PROGRAM={}&DATABASE={}&QUERY={}",
            self.base_url,
            encode(&params.program.program),
            encode(&params.database),
            params.encoded_query
        );
        if let Some((key, value)) = params.program.extra {
            url.push_str(&format!("&{}={}", key, value));
        }
        url
    }

    async fn get_text(&self, url: &str) -> AppResult<String> {
        self.http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::http_failed(&self.base_url, e))?
            .text()
            .await
            .map_err(|e| AppError::http_failed(&self.base_url, e))
    }
}
