//! 批量查询处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **扫描**：在查询目录中找出所有序列文件
//! 2. **顺序处理**：逐个调用 `QueryFlow`，两次查询之间固定等待，遵守服务端频率限制
//! 3. **汇总**：表头 + 每条成功记录写入带时间戳的 CSV
//! 4. **统计**：输出成功/失败数量，并与每条查询的结果一起追加到运行日志文件
//!
//! 单个查询失败只记录日志，不影响后续查询。

use crate::config::Config;
use crate::models::scan_query_files;
use crate::services::{format_record_line, HEADER_ROW};
use crate::utils::logging::{append_log_file, init_log_file, truncate_text};
use crate::workflow::{QueryCtx, QueryFlow};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 批量处理器
pub struct BatchProcessor {
    config: Config,
    flow: QueryFlow,
}

/// 一次批量运行的结果
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// 结果文件，没有找到任何序列文件时为 None
    pub output_file: Option<PathBuf>,
    pub stats: ProcessingStats,
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

impl BatchProcessor {
    /// 初始化处理器
    pub fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config);

        let flow = QueryFlow::new(&config)?;
        Ok(Self::new(config, flow))
    }

    pub fn new(config: Config, flow: QueryFlow) -> Self {
        Self { config, flow }
    }

    /// 运行批量处理
    pub async fn run(&self) -> Result<BatchOutcome> {
        info!("\n📁 正在扫描序列文件: {}", self.config.query_folder);
        let files = scan_query_files(&self.config.query_folder)
            .await
            .with_context(|| format!("无法扫描文件夹: {}", self.config.query_folder))?;

        if files.is_empty() {
            warn!("⚠️ 没有找到待处理的序列文件，程序结束");
            return Ok(BatchOutcome::default());
        }

        info!("✓ 找到 {} 个待处理的序列文件", files.len());

        let (lines, stats) = self.process_all(&files).await;

        let output_file = self.write_results(&lines, Local::now())?;
        print_final_stats(&stats, &output_file);
        self.append_run_log(&final_stats_text(&stats, &output_file));

        Ok(BatchOutcome {
            output_file: Some(output_file),
            stats,
        })
    }

    /// 逐个处理，返回成功记录的 CSV 行
    async fn process_all(&self, files: &[PathBuf]) -> (Vec<String>, ProcessingStats) {
        let mut stats = ProcessingStats {
            total: files.len(),
            ..Default::default()
        };
        let mut lines = Vec::new();

        for (idx, path) in files.iter().enumerate() {
            if idx > 0 {
                info!(
                    "💤 等待 {} 秒后处理下一个文件...",
                    self.config.inter_query_delay_secs
                );
                self.flow.sleeper().sleep(self.config.inter_query_delay()).await;
            }

            let ctx = QueryCtx::new(
                &self.config.batch_program,
                &self.config.batch_database,
                vec![path.clone()],
            )
            .with_index(idx + 1);

            info!("\n{}", "─".repeat(60));
            info!("{} 开始处理 ({}/{})", ctx, idx + 1, files.len());

            match self.flow.run(&ctx).await {
                Ok(record) => {
                    let summary = truncate_text(&record.description, 80);
                    info!("{} ✅ {}", ctx, summary);
                    self.append_run_log(&format!("{} ✅ {} | {}\n", ctx, record.accession, summary));
                    lines.push(format_record_line(&record));
                    stats.success += 1;
                }
                Err(e) => {
                    error!("{} ❌ 处理失败: {}", ctx, e);
                    self.append_run_log(&format!("{} ❌ 处理失败: {}\n", ctx, e));
                    stats.failed += 1;
                }
            }
        }

        (lines, stats)
    }

    /// 追加到运行日志文件，写入失败只告警
    fn append_run_log(&self, content: &str) {
        if let Err(e) = append_log_file(&self.config.output_log_file, content) {
            warn!("⚠️ 无法写入日志文件 {}: {}", self.config.output_log_file, e);
        }
    }

    /// 写入结果文件
    fn write_results(&self, lines: &[String], now: DateTime<Local>) -> Result<PathBuf> {
        let path = Path::new(&self.config.output_folder).join(output_file_name(now));

        let mut content = String::with_capacity(HEADER_ROW.len() + 1 + lines.iter().map(String::len).sum::<usize>());
        content.push_str(HEADER_ROW);
        content.push('\n');
        for line in lines {
            content.push_str(line);
        }

        fs::write(&path, content).with_context(|| format!("无法写入结果文件: {}", path.display()))?;
        Ok(path)
    }
}

/// 结果文件名：`blast_results_<YYYY-MM-DD_HHMMSS>.csv`
pub fn output_file_name(now: DateTime<Local>) -> String {
    format!("blast_results_{}.csv", now.format("%Y-%m-%d_%H%M%S"))
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量 BLAST 查询模式");
    info!("🧬 程序: {} | 数据库: {}", config.batch_program, config.batch_database);
    info!("⏱️ 查询间隔: {} 秒", config.inter_query_delay_secs);
    info!("{}", "=".repeat(60));
}

fn print_final_stats(stats: &ProcessingStats, output_file: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total);
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_file.display());
}

/// 写入日志文件的统计摘要
fn final_stats_text(stats: &ProcessingStats, output_file: &Path) -> String {
    format!(
        "\n{sep}\n📊 全部处理完成统计\n完成时间: {}\n{sep}\n✅ 成功: {}/{}\n❌ 失败: {}\n{sep}\n结果已保存至: {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        stats.success,
        stats.total,
        stats.failed,
        output_file.display(),
        sep = "=".repeat(60),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_output_file_name() {
        let now = Local.with_ymd_and_hms(2026, 3, 9, 7, 5, 2).unwrap();
        assert_eq!(output_file_name(now), "blast_results_2026-03-09_070502.csv");
    }

    #[test]
    fn test_final_stats_text() {
        let stats = ProcessingStats {
            success: 3,
            failed: 1,
            total: 4,
        };
        let text = final_stats_text(&stats, Path::new("out/blast_results_x.csv"));
        assert!(text.contains("✅ 成功: 3/4"));
        assert!(text.contains("❌ 失败: 1"));
        assert!(text.contains("结果已保存至: out/blast_results_x.csv"));
    }
}
