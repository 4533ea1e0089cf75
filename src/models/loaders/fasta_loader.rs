use crate::error::{AppError, AppResult};
use crate::models::query::Query;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 批量模式识别的序列文件扩展名（不区分大小写）
pub const QUERY_EXTENSIONS: [&str; 3] = ["fasta", "fa", "fna"];

/// 从序列文件加载查询
pub async fn load_query(path: &Path) -> AppResult<Query> {
    let contents = fs::read(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let query = Query::from_contents(path, &contents);
    tracing::debug!(
        "已加载查询 {}: 序列长度 {}",
        query.identifier,
        query.sequence.len()
    );
    Ok(query)
}

/// 按顺序加载多个序列文件，任意一个失败即返回错误
pub async fn load_queries(paths: &[PathBuf]) -> AppResult<Vec<Query>> {
    let mut queries = Vec::with_capacity(paths.len());
    for path in paths {
        queries.push(load_query(path).await?);
    }
    Ok(queries)
}

pub fn is_query_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| QUERY_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// 扫描文件夹中的序列文件，按文件名排序
pub async fn scan_query_files(folder_path: &str) -> AppResult<Vec<PathBuf>> {
    let folder = PathBuf::from(folder_path);

    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?
    {
        let path = entry.path();
        if path.is_file() && is_query_file(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
