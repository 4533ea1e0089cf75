use std::path::Path;

/// FASTA 头部标记
pub const HEADER_MARKER: char = '>';

/// 一条待提交的查询
///
/// 从序列文件加载后不再修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// 文件名去掉最后一个扩展名
    pub identifier: String,
    /// 去掉头部行和换行符后的纯序列
    pub sequence: String,
    /// 整个文件内容的百分号编码，直接拼进请求 URL
    pub encoded: String,
}

impl Query {
    /// 由文件路径和原始内容构建查询
    pub fn from_contents(path: &Path, contents: &[u8]) -> Self {
        let text = String::from_utf8_lossy(contents);
        Self {
            identifier: identifier_from_path(path),
            sequence: extract_sequence(&text),
            encoded: urlencoding::encode_binary(contents).into_owned(),
        }
    }
}

/// 文件名（不含目录）去掉最后一个扩展名，大小写不变
pub fn identifier_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 提取纯序列
///
/// 第一行以 `>` 开头时丢弃，其余各行拼接并去掉 `\r` `\n`。
pub fn extract_sequence(text: &str) -> String {
    let body = if text.starts_with(HEADER_MARKER) {
        text.split_once('\n').map(|(_, rest)| rest).unwrap_or("")
    } else {
        text
    };
    body.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}
