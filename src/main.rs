// ==========================================
// 出口报价计算引擎 - 命令行入口
// ==========================================
// 用法:
//   export-quotation <snapshot.json> <request.json> [config.json]
// 结果以 JSON 输出到 stdout，日志输出到 stderr
// ==========================================

use anyhow::{bail, Context};
use export_quotation::importer::{load_engine_config, load_request, load_snapshot};
use export_quotation::{logging, QuoteEngine, QuoteEngineConfig};

fn main() -> anyhow::Result<()> {
    // QUOTE_LOG_FORMAT=json 时输出 JSON 日志
    match std::env::var("QUOTE_LOG_FORMAT").as_deref() {
        Ok("json") => logging::init_json(),
        _ => logging::init(),
    }

    let mut args = std::env::args().skip(1);
    let (snapshot_path, request_path) = match (args.next(), args.next()) {
        (Some(s), Some(r)) => (s, r),
        _ => bail!("用法: export-quotation <snapshot.json> <request.json> [config.json]"),
    };
    let config_path = args.next();

    tracing::info!("{} v{}", export_quotation::APP_NAME, export_quotation::VERSION);

    let snapshot = load_snapshot(&snapshot_path)
        .with_context(|| format!("加载参考数据失败: {}", snapshot_path))?;
    let request = load_request(&request_path)
        .with_context(|| format!("加载报价请求失败: {}", request_path))?;
    let config = match config_path {
        Some(path) => {
            load_engine_config(&path).with_context(|| format!("加载引擎配置失败: {}", path))?
        }
        None => QuoteEngineConfig::default(),
    };

    let engine = QuoteEngine::new(config);
    let result = match engine.calculate(&snapshot, &request) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(code = e.code(), "报价计算失败: {}", e);
            return Err(e).context("报价计算失败");
        }
    };

    for warning in &result.warnings {
        tracing::info!(kind = %warning.kind, "{}", warning.message);
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
