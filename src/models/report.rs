//! JSON2_S 结果结构与输出记录
//!
//! 只声明用到的字段，全部为可选，缺失时由调用方给出带字段名的错误。

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// 顶层结构 `{"BlastOutput2": [...]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlastJsonReport {
    #[serde(rename = "BlastOutput2", default)]
    pub outputs: Vec<BlastOutput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlastOutput {
    pub report: Option<Report>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Report {
    pub results: Option<ReportResults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportResults {
    pub search: Option<Search>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Search {
    pub query_len: Option<u64>,
    pub hits: Option<Vec<Hit>>,
}

/// 一个命中
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hit {
    #[serde(default)]
    pub description: Vec<HitDescription>,
    /// 命中序列长度
    pub len: Option<u64>,
    #[serde(default)]
    pub hsps: Vec<Hsp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitDescription {
    pub title: Option<String>,
    pub accession: Option<String>,
    pub sciname: Option<String>,
}

/// 一个局部比对片段 (HSP)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hsp {
    pub bit_score: Option<f64>,
    pub score: Option<f64>,
    pub identity: Option<u64>,
    pub evalue: Option<f64>,
}

impl BlastJsonReport {
    /// 定位到第一个报告的 search 节点
    pub fn search(&self) -> AppResult<&Search> {
        let output = self
            .outputs
            .first()
            .ok_or_else(|| AppError::missing_field("BlastOutput2[0]"))?;
        output
            .report
            .as_ref()
            .ok_or_else(|| AppError::missing_field("report"))?
            .results
            .as_ref()
            .ok_or_else(|| AppError::missing_field("report.results"))?
            .search
            .as_ref()
            .ok_or_else(|| AppError::missing_field("report.results.search"))
    }
}

/// 单条查询的最终输出
///
/// 字段顺序固定，与批量输出的表头一致。
/// `query_length` 只出现在 JSON 输出里；缺失的 `sciname` 在 JSON 中为 `null`，在 CSV 中为空。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub basename: String,
    pub description: String,
    pub scientific_name: Option<String>,
    pub max_score: f64,
    pub total_score: f64,
    pub query_cover: String,
    pub e_value: f64,
    pub percent_identity: String,
    pub accession_length: u64,
    pub accession: String,
    pub query_length: u64,
    pub sequence: String,
}

impl ResultRecord {
    /// 按固定顺序转成文本字段
    pub fn fields(&self) -> [String; 11] {
        [
            self.basename.clone(),
            self.description.clone(),
            self.scientific_name.clone().unwrap_or_default(),
            format_number(self.max_score),
            format_number(self.total_score),
            self.query_cover.clone(),
            format_number(self.e_value),
            self.percent_identity.clone(),
            self.accession_length.to_string(),
            self.accession.clone(),
            self.sequence.clone(),
        ]
    }
}

/// 数值转文本
///
/// 整数值不带小数点，极小或极大的值用科学计数法（e-value 常见 `1e-30`）。
pub fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if value != 0.0 && (magnitude < 1e-4 || magnitude >= 1e15) {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}
