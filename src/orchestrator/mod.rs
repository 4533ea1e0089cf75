//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<序列文件>)
//!     ↓
//! workflow::QueryFlow (处理单条查询)
//!     ↓
//! services (能力层：submit / poll / extract / format)
//!     ↓
//! clients + infrastructure (HTTP 客户端、等待)
//! ```
//!
//! 本层只做调度和统计，不做具体业务判断。

pub mod batch_processor;

pub use batch_processor::{output_file_name, BatchOutcome, BatchProcessor, ProcessingStats};
