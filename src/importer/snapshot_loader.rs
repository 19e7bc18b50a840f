// ==========================================
// 出口报价计算引擎 - JSON 加载器
// ==========================================
// 职责: 只读加载参考数据快照 / 报价请求 / 引擎配置
// 红线: 不写回、不迁移 schema，数据维护不在此处
// ==========================================

use crate::config::QuoteEngineConfig;
use crate::domain::quote::QuoteRequest;
use crate::domain::reference::ReferenceSnapshot;
use crate::importer::error::{ImportError, ImportResult};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// 读取 JSON 文件并反序列化
///
/// # 参数
/// - path: 文件路径（扩展名必须为 .json）
/// - target: 目标类型名称（用于错误信息）
fn load_json<T: DeserializeOwned>(path: &Path, target: &str) -> ImportResult<T> {
    // 检查文件存在
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    // 检查扩展名
    if let Some(ext) = path.extension() {
        if !ext.eq_ignore_ascii_case("json") {
            return Err(ImportError::UnsupportedFormat(
                ext.to_string_lossy().to_string(),
            ));
        }
    }

    let raw = fs::read_to_string(path)?;
    let value = parse_json(&raw, target)?;

    tracing::info!(path = %path.display(), data_type = target, "已加载 JSON 文件");
    Ok(value)
}

fn parse_json<T: DeserializeOwned>(raw: &str, target: &str) -> ImportResult<T> {
    serde_json::from_str(raw).map_err(|e| ImportError::JsonParseError {
        target: target.to_string(),
        message: e.to_string(),
    })
}

/// 从 JSON 文本解析参考数据快照
pub fn parse_snapshot(raw: &str) -> ImportResult<ReferenceSnapshot> {
    parse_json(raw, "ReferenceSnapshot")
}

/// 加载参考数据快照
pub fn load_snapshot(path: impl AsRef<Path>) -> ImportResult<ReferenceSnapshot> {
    let snapshot: ReferenceSnapshot = load_json(path.as_ref(), "ReferenceSnapshot")?;
    tracing::debug!(
        products = snapshot.products.len(),
        packaging_options = snapshot.packaging_options.len(),
        factories = snapshot.factories.len(),
        port_charges_rules = snapshot.port_charges_rules.len(),
        land_freight_rules = snapshot.land_freight_rules.len(),
        "参考数据快照统计"
    );
    Ok(snapshot)
}

/// 加载报价请求
pub fn load_request(path: impl AsRef<Path>) -> ImportResult<QuoteRequest> {
    load_json(path.as_ref(), "QuoteRequest")
}

/// 加载引擎配置（缺省键保留默认值）
pub fn load_engine_config(path: impl AsRef<Path>) -> ImportResult<QuoteEngineConfig> {
    load_json(path.as_ref(), "QuoteEngineConfig")
}
