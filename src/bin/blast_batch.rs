use anyhow::Result;
use web_blast::utils::logging;
use web_blast::{BatchProcessor, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行
    let outcome = BatchProcessor::initialize(config)?.run().await?;

    if outcome.stats.total > 0 && outcome.stats.success == 0 {
        anyhow::bail!("所有 {} 个查询均失败", outcome.stats.total);
    }

    Ok(())
}
