//! # Web BLAST
//!
//! 通过 NCBI BLAST URL API 提交序列搜索、轮询完成状态，并把最佳命中整理成一行 CSV。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层
//! - `clients/` - `BlastClient`，唯一持有 HTTP 连接池
//! - `infrastructure/` - `Sleeper`，所有等待都经过它
//!
//! ### ② 业务能力层（Services）
//! - `SubmitService` - 提交并解析 RID / RTOE
//! - `PollLoop` - 轮询状态机
//! - `ExtractService` - 解析结果、计算指标
//! - `record_formatter` - CSV / JSON 输出
//!
//! ### ③ 流程层（Workflow）
//! - `QueryFlow` - 单条查询：加载 → 提交 → 轮询 → 提取
//!
//! ### ④ 编排层（Orchestration）
//! - `BatchProcessor` - 扫描目录、顺序处理、汇总写文件

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::BlastClient;
pub use config::{Config, TransportConfig};
pub use error::{AppError, AppResult};
pub use models::{JobHandle, JobStatus, Query, ResultRecord, SubmissionParams};
pub use orchestrator::BatchProcessor;
pub use workflow::{QueryCtx, QueryFlow};
