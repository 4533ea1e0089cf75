use std::io::Write;
use std::process::ExitCode;

use tracing::error;
use web_blast::cli::{parse_arguments, OutputFormat, USAGE};
use web_blast::services::{format_record_json, format_record_line};
use web_blast::utils::logging;
use web_blast::{AppError, AppResult, Config, QueryCtx, QueryFlow};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let cli = match parse_arguments(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", e);
            eprint!("{}", USAGE);
            return exit_code(&e);
        }
    };

    // 加载配置
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return exit_code(&e);
        }
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    let ctx = QueryCtx::new(cli.program, cli.database, cli.queries);
    match run(&config, &ctx, cli.output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{} ❌ {}", ctx, e);
            exit_code(&e)
        }
    }
}

async fn run(config: &Config, ctx: &QueryCtx, output: OutputFormat) -> AppResult<()> {
    let flow = QueryFlow::new(config)?;
    let record = flow.run(ctx).await?;

    let text = match output {
        OutputFormat::Csv => format_record_line(&record),
        OutputFormat::Json => format_record_json(&record)? + "\n",
    };

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| AppError::Io {
            path: "<stdout>".to_string(),
            source: e,
        })
}

fn exit_code(err: &AppError) -> ExitCode {
    ExitCode::from(err.exit_code() as u8)
}
