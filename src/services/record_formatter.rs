//! 输出记录格式化
//!
//! 一条记录就是一行 CSV；多条记录的汇总和表头由批量处理负责。

use crate::models::ResultRecord;

/// 批量输出文件的表头，列顺序与 `ResultRecord::fields` 一致
pub const HEADER_ROW: &str = "basename,description,scientific_name,max_score,total_score,query_cover,e_value,percent_identity,accession_length,accession,sequence";

/// 含逗号或双引号的字段用双引号包裹，内部双引号加倍
pub fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// 格式化为一行 CSV（带换行）
pub fn format_record_line(record: &ResultRecord) -> String {
    let mut line = record
        .fields()
        .iter()
        .map(|field| csv_escape(field))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// 格式化为 JSON
pub fn format_record_json(record: &ResultRecord) -> serde_json::Result<String> {
    serde_json::to_string_pretty(record)
}
