//! 查询处理上下文
//!
//! 封装"用什么程序、在哪个库、提交哪些文件"这一信息

use std::fmt::Display;
use std::path::PathBuf;

/// 单次查询的上下文
#[derive(Debug, Clone)]
pub struct QueryCtx {
    /// 程序名（别名展开前）
    pub program: String,
    /// 数据库名
    pub database: String,
    /// 序列文件，第一个文件提供结果行的标识和序列
    pub query_paths: Vec<PathBuf>,
    /// 批量中的序号（仅用于日志显示）
    pub index: usize,
}

impl QueryCtx {
    pub fn new(program: impl Into<String>, database: impl Into<String>, query_paths: Vec<PathBuf>) -> Self {
        Self {
            program: program.into(),
            database: database.into(),
            query_paths,
            index: 1,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

impl Display for QueryCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let first = self
            .query_paths
            .first()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        write!(
            f,
            "[查询 #{} {} {}/{}]",
            self.index, first, self.program, self.database
        )
    }
}
