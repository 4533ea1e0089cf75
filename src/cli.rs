//! 单条查询的命令行参数

use crate::error::{AppError, AppResult};
use std::path::PathBuf;

pub const USAGE: &str = "usage: web_blast [--output json|csv] program database query [query]...
where program = megablast, blastn, blastp, rpsblast, blastx, tblastn, tblastx

example: web_blast blastp nr protein.fasta
example: web_blast rpsblast cdd protein.fasta
example: web_blast megablast nt dna1.fasta dna2.fasta
";

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub output: OutputFormat,
    pub program: String,
    pub database: String,
    pub queries: Vec<PathBuf>,
}

/// 解析参数（不含程序名）
pub fn parse_arguments(args: &[String]) -> AppResult<CliArgs> {
    let mut rest = args;
    let mut output = OutputFormat::default();

    if rest.first().map(String::as_str) == Some("--output") {
        output = match rest.get(1).map(String::as_str) {
            Some("csv") => OutputFormat::Csv,
            Some("json") => OutputFormat::Json,
            Some(other) => {
                return Err(AppError::Argument(format!(
                    "无效的输出格式 '{}'，请使用 csv 或 json",
                    other
                )))
            }
            None => return Err(AppError::Argument("--output 缺少取值".to_string())),
        };
        rest = &rest[2..];
    }

    if rest.len() < 3 {
        return Err(AppError::Argument("参数数量不足".to_string()));
    }

    Ok(CliArgs {
        output,
        program: rest[0].clone(),
        database: rest[1].clone(),
        queries: rest[2..].iter().map(PathBuf::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_minimal_arguments() {
        let parsed = parse_arguments(&args(&["blastn", "nt", "a.fasta"])).unwrap();
        assert_eq!(parsed.output, OutputFormat::Csv);
        assert_eq!(parsed.program, "blastn");
        assert_eq!(parsed.database, "nt");
        assert_eq!(parsed.queries, vec![PathBuf::from("a.fasta")]);
    }

    #[test]
    fn test_output_flag_and_multiple_queries() {
        let parsed =
            parse_arguments(&args(&["--output", "json", "megablast", "nt", "a.fa", "b.fa"])).unwrap();
        assert_eq!(parsed.output, OutputFormat::Json);
        assert_eq!(parsed.queries.len(), 2);
    }

    #[test]
    fn test_invalid_arguments_exit_with_one() {
        for bad in [
            args(&["blastn", "nt"]),
            args(&[]),
            args(&["--output"]),
            args(&["--output", "xml", "blastn", "nt", "a.fa"]),
            args(&["--output", "json", "blastn", "nt"]),
        ] {
            let err = parse_arguments(&bad).unwrap_err();
            assert_eq!(err.exit_code(), 1);
        }
    }
}
