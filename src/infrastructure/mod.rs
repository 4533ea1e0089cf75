//! 基础设施层
//!
//! 只暴露能力，不认识查询或任务

pub mod sleeper;

pub use sleeper::{Sleeper, TokioSleeper};
