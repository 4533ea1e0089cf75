//! 结果提取服务 - 业务能力层
//!
//! 获取 JSON2_S 结果，取第一个命中计算各项指标。
//! 不做任何重新排序，命中顺序以服务端返回为准。

use crate::clients::BlastClient;
use crate::error::{AppError, AppResult};
use crate::models::report::{BlastJsonReport, Hit, Hsp};
use crate::models::{JobHandle, Query, ResultRecord};
use tracing::{debug, info};

pub struct ExtractService {
    client: BlastClient,
}

impl ExtractService {
    pub fn new(client: BlastClient) -> Self {
        Self { client }
    }

    /// 获取结果并生成输出记录
    pub async fn fetch_record(&self, handle: &JobHandle, query: &Query) -> AppResult<ResultRecord> {
        let report = self.client.fetch_report(&handle.rid).await?;
        let record = extract_record(&report, query, &handle.rid)?;
        info!(
            "✓ 最佳命中: {} ({})",
            record.accession, record.description
        );
        Ok(record)
    }
}

/// HSP 汇总
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitMetrics {
    pub max_bit_score: f64,
    pub total_bit_score: f64,
    pub total_score: f64,
    pub total_identity: u64,
    /// 第一个 HSP 的 e-value（不是最小值）
    pub first_evalue: f64,
}

impl HitMetrics {
    /// 汇总一个命中的全部 HSP
    pub fn from_hsps(hsps: &[Hsp]) -> AppResult<Self> {
        let first = hsps.first().ok_or_else(|| AppError::missing_field("hits[0].hsps"))?;

        let mut metrics = HitMetrics {
            max_bit_score: f64::NEG_INFINITY,
            total_bit_score: 0.0,
            total_score: 0.0,
            total_identity: 0,
            first_evalue: first
                .evalue
                .ok_or_else(|| AppError::missing_field("hsps[0].evalue"))?,
        };

        for (i, hsp) in hsps.iter().enumerate() {
            let bit_score = hsp
                .bit_score
                .ok_or_else(|| AppError::missing_field(format!("hsps[{}].bit_score", i)))?;
            let score = hsp
                .score
                .ok_or_else(|| AppError::missing_field(format!("hsps[{}].score", i)))?;
            let identity = hsp
                .identity
                .ok_or_else(|| AppError::missing_field(format!("hsps[{}].identity", i)))?;

            metrics.max_bit_score = metrics.max_bit_score.max(bit_score);
            metrics.total_bit_score += bit_score;
            metrics.total_score += score;
            metrics.total_identity += identity;
        }

        Ok(metrics)
    }
}

/// 百分比文本：一位小数加 `%`
pub fn format_percent(numerator: f64, query_len: u64) -> AppResult<String> {
    if query_len == 0 {
        return Err(AppError::ZeroQueryLength);
    }
    Ok(format!("{:.1}%", 100.0 * numerator / query_len as f64))
}

/// 从结果结构生成输出记录
pub fn extract_record(report: &BlastJsonReport, query: &Query, rid: &str) -> AppResult<ResultRecord> {
    let search = report.search()?;

    let hits = search
        .hits
        .as_ref()
        .ok_or_else(|| AppError::missing_field("report.results.search.hits"))?;
    let hit: &Hit = hits.first().ok_or_else(|| AppError::NoHit {
        rid: rid.to_string(),
    })?;
    let query_len = search
        .query_len
        .ok_or_else(|| AppError::missing_field("report.results.search.query_len"))?;

    debug!("命中总数: {}，query_len: {}", hits.len(), query_len);

    let description = hit
        .description
        .first()
        .ok_or_else(|| AppError::missing_field("hits[0].description"))?;
    let title = description
        .title
        .clone()
        .ok_or_else(|| AppError::missing_field("hits[0].description[0].title"))?;
    let accession = description
        .accession
        .clone()
        .ok_or_else(|| AppError::missing_field("hits[0].description[0].accession"))?;
    let accession_length = hit
        .len
        .ok_or_else(|| AppError::missing_field("hits[0].len"))?;

    let metrics = HitMetrics::from_hsps(&hit.hsps)?;

    Ok(ResultRecord {
        basename: query.identifier.clone(),
        description: title,
        scientific_name: description.sciname.clone(),
        max_score: metrics.max_bit_score,
        total_score: metrics.total_bit_score,
        query_cover: format_percent(metrics.total_score, query_len)?,
        e_value: metrics.first_evalue,
        percent_identity: format_percent(metrics.total_identity as f64, query_len)?,
        accession_length,
        accession,
        query_length: query_len,
        sequence: query.sequence.clone(),
    })
}
